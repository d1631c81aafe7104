use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::runtime::timer::TimerPolicy;
use crate::submitter::form_submitter::DEFAULT_HIDE_DELAY_MS;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-submitter",
    version,
    about = "Submit a page's contact form asynchronously and show the server's reply"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: form-submitter.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill the form, submit it and print the message area
    Submit {
        /// Page description (YAML or JSON)
        #[arg(long)]
        page: String,

        /// Field value as name=value (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Form selector (overrides config)
        #[arg(long)]
        form: Option<String>,

        /// Message area selector (overrides config)
        #[arg(long)]
        message: Option<String>,

        /// Milliseconds before the message hides again (overrides config)
        #[arg(long)]
        hide_delay_ms: Option<u64>,

        /// Overlapping hide timers: independent or reschedule
        #[arg(long)]
        timer_policy: Option<String>,

        /// Keep running until the message has been hidden again
        #[arg(long, default_value_t = false)]
        linger: bool,
    },

    /// Print the form-encoded payload without sending it
    Serialize {
        /// Page description (YAML or JSON)
        #[arg(long)]
        page: String,

        /// Field value as name=value (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Form selector (overrides config)
        #[arg(long)]
        form: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-submitter.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// JSONL trace output; tracing is off when unset
    #[serde(default)]
    pub trace_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_form_selector")]
    pub form_selector: String,

    #[serde(default = "default_message_selector")]
    pub message_selector: String,

    #[serde(default = "default_hide_delay")]
    pub hide_delay_ms: u64,

    #[serde(default)]
    pub timer_policy: TimerPolicy,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_selector: default_form_selector(),
            message_selector: default_message_selector(),
            hide_delay_ms: DEFAULT_HIDE_DELAY_MS,
            timer_policy: TimerPolicy::Independent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

// Serde default helpers
fn default_form_selector() -> String { ".contact_form".to_string() }
fn default_message_selector() -> String { ".contact_msg".to_string() }
fn default_hide_delay() -> u64 { DEFAULT_HIDE_DELAY_MS }
fn default_timeout() -> u64 { 30 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-submitter.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Argument Helpers
// ============================================================================

/// Split `name=value`. The value may itself contain `=` or be empty.
pub fn parse_field_arg(arg: &str) -> Result<(String, String), FormError> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(FormError::InvalidFieldArg(arg.to_string())),
    }
}

pub fn parse_field_args(args: &[String]) -> Result<Vec<(String, String)>, FormError> {
    args.iter().map(|a| parse_field_arg(a)).collect()
}

/// CLI value if given, otherwise the config file's.
pub fn resolve_policy(cli: Option<&str>, config: TimerPolicy) -> TimerPolicy {
    cli.and_then(TimerPolicy::parse).unwrap_or(config)
}
