//! Command-line front end: exports a project folder, or one of its sections,
//! to PDF.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueHint};
use config::{Config, Environment, File};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scriptum_pdf::{
    ExportConfig, ExportFormat, Exporter, LabelOverrides, Labels, Language, ProjectDir,
    SectionSource,
};

const LOCAL_CONFIG_BASENAME: &str = "scriptum";
const ENV_PREFIX: &str = "SCRIPTUM";
const DEFAULT_DIRECTIVES: &str = "warn,scriptum_pdf=info";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "scriptum-export", version, about = "Export Scriptum projects to PDF")]
struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "SCRIPTUM_CONFIG_FILE", value_name = "PATH", global = true)]
    config_file: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args, Default, Clone)]
struct Overrides {
    /// Label language (it|en).
    #[arg(long = "lang", value_name = "LANG", global = true)]
    lang: Option<Language>,

    /// Directory holding the bundled TrueType fonts.
    #[arg(long = "fonts-dir", value_name = "PATH", value_hint = ValueHint::DirPath, global = true)]
    fonts_dir: Option<PathBuf>,

    /// JSON file with label overrides.
    #[arg(long = "labels", value_name = "FILE", value_hint = ValueHint::FilePath, global = true)]
    labels: Option<PathBuf>,
}

#[derive(Debug, Subcommand, Clone)]
enum Command {
    /// Export several sections of a project into one document.
    Project(ProjectArgs),
    /// Export a single section.
    Section(SectionArgs),
}

#[derive(Debug, Args, Clone)]
struct ProjectArgs {
    /// Project folder.
    #[arg(value_hint = ValueHint::DirPath)]
    dir: PathBuf,

    /// Section ids in export order; defaults to every section of the project type.
    #[arg(long, value_delimiter = ',', value_name = "IDS")]
    sections: Vec<String>,

    #[arg(long, default_value = "pdf")]
    format: String,

    /// Output file; defaults to `export_<name>.pdf` inside the project folder.
    #[arg(long, short, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
struct SectionArgs {
    /// Project folder.
    #[arg(value_hint = ValueHint::DirPath)]
    dir: PathBuf,

    /// Section id, e.g. `scene` or `personaggi`.
    id: String,

    /// Output file; defaults to `<id>_export.pdf` inside the project folder.
    #[arg(long, short, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let cli = CliArgs::parse();
    init_tracing()?;

    let config = load_config(&cli)?;
    let labels = load_labels(cli.overrides.labels.as_ref(), config.language).await?;

    let path = match cli.command {
        Command::Project(args) => {
            let format: ExportFormat = args.format.parse()?;
            let exporter = exporter(&args.dir, labels, config);

            let sections = if args.sections.is_empty() {
                let meta = exporter.source().meta().await?;
                meta.project_type
                    .unwrap_or_default()
                    .default_sections()
                    .iter()
                    .map(|id| id.to_string())
                    .collect()
            } else {
                args.sections
            };

            exporter
                .export_project(&sections, format, args.output.as_deref())
                .await?
        }
        Command::Section(args) => {
            let exporter = exporter(&args.dir, labels, config);
            exporter
                .export_section(&args.id, args.output.as_deref())
                .await?
        }
    };

    println!("{}", path.display());
    Ok(())
}

fn init_tracing() -> Result<(), BoxError> {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(_) => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
        Err(_) => EnvFilter::new(DEFAULT_DIRECTIVES),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .map_err(|err| format!("failed to install tracing subscriber: {err}").into())
}

/// Layered settings: local `scriptum.*` file, `--config-file`, then
/// `SCRIPTUM__*` environment variables, then command-line flags.
fn load_config(cli: &CliArgs) -> Result<ExportConfig, BoxError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut config: ExportConfig = builder.build()?.try_deserialize()?;

    if let Some(lang) = cli.overrides.lang {
        config.language = lang;
    }
    if let Some(dir) = cli.overrides.fonts_dir.clone() {
        config.fonts_dir = Some(dir);
    }

    Ok(config)
}

/// Labels from an overrides file, merged over the defaults of `language`.
async fn load_labels(path: Option<&PathBuf>, language: Language) -> Result<Option<Labels>, BoxError> {
    let Some(path) = path else {
        return Ok(None);
    };

    let raw = tokio::fs::read_to_string(path).await?;
    let mut overrides: LabelOverrides = serde_json::from_str(&raw)?;
    overrides.lang.get_or_insert(language);

    Ok(Some(overrides.into()))
}

fn exporter(dir: &Path, labels: Option<Labels>, config: ExportConfig) -> Exporter<ProjectDir> {
    let source = ProjectDir::new(dir);
    match labels {
        Some(labels) => Exporter::new(source, labels, config),
        None => Exporter::from_config(source, config),
    }
}
