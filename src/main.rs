use clap::{Parser, Subcommand};
use doc_redirects::config::{self, RedirectMap};
use doc_redirects::host::{Application, RendererEvent};
use doc_redirects::{emit, output, plugin};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "doc-redirects")]
#[command(about = "Write static redirect pages into a generated documentation site")]
#[command(long_about = "\
Write static redirect pages into a generated documentation site

Each old path gets a small HTML page that sends the browser to the new
location with <meta http-equiv=\"refresh\">. No server configuration needed.

Config file (config.toml):

  [redirects]
  \"old.html\" = \"new.html\"            # relative to the output directory
  \"guide/\" = \"/docs/guide/\"          # writes guide/index.html
  \"api.html\" = \"https://example.com/\"

Run after the site has been generated, so redirects land in the final
output. Existing files at a redirect path are overwritten with a warning.

Run 'doc-redirects gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (TOML, or JSON if the name ends in .json)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Generated site directory to write redirects into
    #[arg(long, default_value = "docs", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write all redirect pages into the output directory
    Emit,
    /// Validate the config without writing anything
    Check,
    /// Show where each redirect would be written and what it links to
    List,
    /// List the options this tool reads from the config file
    Options,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Emit => {
            let output_dir = std::path::absolute(&cli.output)?;
            let report_dir = output_dir.clone();
            let mut app = Application::new();
            plugin::load_with(&mut app, move |report| {
                output::print_emit_output(report, &report_dir)
            })?;
            read_config(&mut app, &cli.config)?;
            println!("==> Writing redirects → {}", output_dir.display());
            app.render_end(&RendererEvent {
                output_directory: output_dir,
            })?;
        }
        Command::Check => {
            let mut app = Application::new();
            plugin::load(&mut app)?;
            read_config(&mut app, &cli.config)?;
            println!("==> Checking {}", cli.config.display());
            let redirects = RedirectMap::from_value(app.options.get_value(plugin::REDIRECTS_OPTION))?;
            output::print_check_output(&redirects);
        }
        Command::List => {
            let output_dir = std::path::absolute(&cli.output)?;
            let mut app = Application::new();
            plugin::load(&mut app)?;
            read_config(&mut app, &cli.config)?;
            let redirects = RedirectMap::from_value(app.options.get_value(plugin::REDIRECTS_OPTION))?;
            let pages = emit::plan(&redirects, &output_dir)?;
            output::print_plan_output(&pages, &output_dir);
        }
        Command::Options => {
            let mut app = Application::new();
            plugin::load(&mut app)?;
            output::print_options_output(&app.options);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Read the config file into the host's options. A missing file leaves every
/// option at its default.
fn read_config(app: &mut Application, path: &Path) -> Result<(), config::ConfigError> {
    if !app.options.read_config_file(path)? {
        log::warn!(
            "{} {} not found; no redirects configured",
            emit::LOG_PREFIX,
            path.display()
        );
    }
    Ok(())
}
