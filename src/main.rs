use clap::Parser;
use form_submitter::cli::commands::{SubmitArgs, cmd_serialize, cmd_submit};
use form_submitter::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Submit {
            page,
            fields,
            form,
            message,
            hide_delay_ms,
            timer_policy,
            linger,
        } => {
            let args = SubmitArgs {
                page: &page,
                fields: &fields,
                form: form.as_deref(),
                message: message.as_deref(),
                hide_delay_ms,
                timer_policy: timer_policy.as_deref(),
                linger,
            };
            let accepted = cmd_submit(&args, &config, cli.verbose)?;
            if !accepted {
                std::process::exit(1);
            }
        }
        Commands::Serialize { page, fields, form } => {
            cmd_serialize(&page, &fields, form.as_deref(), &config)?;
        }
    }

    Ok(())
}
