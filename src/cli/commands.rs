use std::sync::Arc;
use std::time::Duration;

use crate::cli::config::{AppConfig, parse_field_args, resolve_policy};
use crate::error::FormError;
use crate::form::fill::fill_fields;
use crate::form::serialize::serialize;
use crate::page::loader::load_page;
use crate::report::console::{format_message_area, format_payload};
use crate::runtime::clock::SystemClock;
use crate::runtime::event_loop::EventLoop;
use crate::trace::logger::TraceLogger;
use crate::transport::http::HttpTransport;

// ============================================================================
// submit subcommand
// ============================================================================

pub struct SubmitArgs<'a> {
    pub page: &'a str,
    pub fields: &'a [String],
    pub form: Option<&'a str>,
    pub message: Option<&'a str>,
    pub hide_delay_ms: Option<u64>,
    pub timer_policy: Option<&'a str>,
    pub linger: bool,
}

/// Submit the first bound form. Returns whether the server accepted it.
pub fn cmd_submit(
    args: &SubmitArgs<'_>,
    config: &AppConfig,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let document = load_page(args.page)?;
    let values = parse_field_args(args.fields)?;

    let form_selector = args.form.unwrap_or(&config.form.form_selector);
    let message_selector = args.message.unwrap_or(&config.form.message_selector);
    let hide_delay = args.hide_delay_ms.unwrap_or(config.form.hide_delay_ms);
    let policy = resolve_policy(args.timer_policy, config.form.timer_policy);

    let transport = HttpTransport::new(
        Duration::from_secs(config.http.timeout_secs),
        config.http.user_agent.as_deref(),
    )?;

    let mut event_loop = EventLoop::new(document, Arc::new(transport), Box::new(SystemClock::new()))
        .with_policy(policy)
        .with_tracer(TraceLogger::from_path(config.trace_file.as_deref()));

    let bound = event_loop.initialize(form_selector, message_selector, hide_delay)?;
    if bound == 0 {
        println!(
            "No form matches '{}' with a message area '{}'; nothing submitted",
            form_selector, message_selector
        );
        return Ok(false);
    }
    if verbose > 0 {
        eprintln!("Bound {} form(s) on {}", bound, args.page);
    }

    let submitter = event_loop.submitters()[0].clone();
    fill_fields(event_loop.document_mut(), submitter.form, &values)?;

    if verbose > 1 {
        eprint!("{}", format_payload(&serialize(event_loop.document(), submitter.form)));
    }

    let event = event_loop.dispatch_submit(submitter.form);
    if verbose > 0 {
        eprintln!("Submitted (navigation prevented: {})", event.default_prevented());
    }

    event_loop.wait_for_responses()?;
    println!("{}", format_message_area(event_loop.document(), &submitter.message));

    let accepted = event_loop
        .outcomes()
        .last()
        .map(|o| o.is_success())
        .unwrap_or(false);

    if args.linger {
        if verbose > 0 {
            eprintln!("Waiting {} ms for the message to hide...", hide_delay);
        }
        event_loop.run_until_idle()?;
        println!("{}", format_message_area(event_loop.document(), &submitter.message));
    }

    Ok(accepted)
}

// ============================================================================
// serialize subcommand
// ============================================================================

pub fn cmd_serialize(
    page: &str,
    fields: &[String],
    form: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut document = load_page(page)?;
    let values = parse_field_args(fields)?;
    let selector = form.unwrap_or(&config.form.form_selector);

    let form = document
        .query_selector_all(selector)?
        .into_iter()
        .find(|id| document.get(*id).map(|el| el.tag == "form").unwrap_or(false))
        .ok_or_else(|| FormError::ElementNotFound {
            selector: selector.to_string(),
        })?;

    fill_fields(&mut document, form, &values)?;
    print!("{}", format_payload(&serialize(&document, form)));
    Ok(())
}
