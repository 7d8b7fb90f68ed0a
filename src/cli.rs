use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "termexam", version, about = "Terminal-based proctored assessment runner")]
pub struct Cli {
    /// Assessment id to fetch from the service
    #[arg(value_name = "assessment-id")]
    pub assessment_id: Option<String>,

    /// Assessment service base URL
    #[arg(long, value_name = "url", default_value = "http://localhost:5000")]
    pub server: String,

    /// Load the assessment definition from a local YAML file (offline mode;
    /// the submission payload is exported to a file instead of posted)
    #[arg(long, value_name = "path")]
    pub definition: Option<String>,

    /// Violation count that forces submission
    #[arg(long, value_name = "count", default_value_t = crate::ledger::DEFAULT_THRESHOLD)]
    pub threshold: usize,

    /// Directory for logs and offline submission exports
    /// [default: platform data dir]
    #[arg(long, value_name = "dir")]
    pub data_dir: Option<String>,
}
