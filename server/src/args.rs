use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration provider, only `file` is supported.
    #[arg(long, default_value = "file")]
    pub config_provider: String,

    /// Path to the configuration file, `CODIUM_CONFIG_PATH` takes precedence when set.
    #[arg(short, long, default_value = "configs/server.toml")]
    pub config_path: String,

    /// Do not start the interactive admin console on stdin.
    #[arg(long, default_value_t = false)]
    pub no_console: bool,
}
