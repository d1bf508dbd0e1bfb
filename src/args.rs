use clap::Parser;

/// Mentor/mentee management service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Data path for the local file store
    #[arg(long, default_value("data"))]
    pub data_path: String,

    /// Database URL; empty selects the local file store
    #[arg(long, default_value(""))]
    pub db_url: String,

    /// Database name
    #[arg(long, default_value("mentorship"), visible_alias("database"))]
    pub db_name: String,

    /// Address to bind to
    #[arg(long, default_value("127.0.0.1"))]
    pub bind: String,

    /// Port number
    #[arg(long, default_value_t = 8090)]
    pub port: u16,

    /// Public FQDN, used as the cookie domain
    #[arg(long, default_value("localhost"))]
    pub pub_fqdn: String,

    /// File with at least 64 bytes of cookie signing key
    #[arg(long)]
    pub cookie_key: Option<String>,
}
