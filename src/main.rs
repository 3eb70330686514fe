//! # invoice-designer
//!
//! Command-line access to the template store.
//!
//! ```bash
//! # Page presets
//! invoice-designer presets
//!
//! # Stored templates
//! invoice-designer list
//! invoice-designer show 42 --zoom 0.5
//! invoice-designer delete 42
//!
//! # Create a stored template from an editor-shape JSON file
//! invoice-designer save studio.json --name "Studio Session"
//!
//! # Portable archives
//! invoice-designer export 42 studio.invtpl
//! invoice-designer import studio.invtpl
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use invoice_designer_lib::{
    commands::{library, template},
    config::DesignerConfig,
    error::AppError,
    init_tracing,
    models::{ComponentKind, TemplateId},
    persistence::archive::ARCHIVE_EXTENSION,
    presets::PRESETS,
    state::AppState,
};

/// Invoice template designer
#[derive(Parser, Debug)]
#[command(name = "invoice-designer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the OS config dir)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the page-size presets and the component palette
    Presets,
    /// List stored templates
    List,
    /// Print the preview document of a stored template as JSON
    Show {
        id: String,
        /// Preview zoom factor
        #[arg(long, default_value = "1.0")]
        zoom: f64,
    },
    /// Delete a stored template
    Delete { id: String },
    /// Store a template read from a JSON file ({ name, layout, components })
    Save {
        file: PathBuf,
        /// Override the name in the file
        #[arg(long)]
        name: Option<String>,
    },
    /// Export a stored template to a .invtpl archive
    ///
    /// The .invtpl extension is added when OUT has none.
    Export { id: String, out: PathBuf },
    /// Import a .invtpl archive as a new stored template
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("{e}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let config = DesignerConfig::load(cli.config.as_deref())?;
    let _tracing_guard = init_tracing(&config.logging)?;
    let store = config.build_store()?;
    let state = AppState::new(Arc::clone(&store));

    match cli.command {
        Commands::Presets => {
            for preset in &PRESETS {
                println!(
                    "{:<6} {} x {} mm, margin {} mm",
                    preset.name, preset.width, preset.height, preset.margin.top
                );
            }
            println!();
            println!("Components:");
            for kind in ComponentKind::ALL {
                println!("  {:<14} {}", kind.as_str(), kind.label());
            }
        }
        Commands::List => {
            let summaries = state.refresh_library().await?;
            if summaries.is_empty() {
                println!("No stored templates.");
            }
            for s in summaries {
                let id = s.id.map(|id| id.to_string()).unwrap_or_default();
                println!(
                    "{id:<38} {:<8} {:>3} components  {}",
                    s.paper_size, s.component_count, s.name
                );
            }
        }
        Commands::Show { id, zoom } => {
            let doc = library::fetch_template_inner(&TemplateId::new(id), zoom, store.as_ref())
                .await?;
            let json = serde_json::to_string_pretty(&doc)
                .map_err(|e| AppError::Io(format!("cannot serialize preview: {e}")))?;
            println!("{json}");
        }
        Commands::Delete { id } => {
            let id = TemplateId::new(id);
            state.delete_template(&id).await?;
            println!("Deleted {id}");
        }
        Commands::Save { file, name } => {
            let json = tokio::fs::read_to_string(&file).await.map_err(|e| {
                AppError::TemplateLoad(format!("cannot read {}: {e}", file.display()))
            })?;
            let loaded = template::template_from_json(&json)?;
            let name = name.unwrap_or_else(|| loaded.name.clone());
            state
                .editor
                .write()
                .map_err(|_| AppError::Io("editor lock poisoned".to_string()))?
                .replace_template(loaded);
            let summary = state.save_template(&name).await?;
            println!(
                "Saved {} as {}",
                summary.name,
                summary.id.map(|id| id.to_string()).unwrap_or_default()
            );
        }
        Commands::Export { id, mut out } => {
            if out.extension().is_none() {
                out.set_extension(ARCHIVE_EXTENSION);
            }
            let manifest =
                library::export_template_inner(&TemplateId::new(id), &out, store.as_ref()).await?;
            println!("Exported to {} (sha256 {})", out.display(), manifest.sha256);
        }
        Commands::Import { file } => {
            let summary = library::import_template_inner(&file, store.as_ref(), &state.library)
                .await?;
            println!(
                "Imported {} as {}",
                summary.name,
                summary.id.map(|id| id.to_string()).unwrap_or_default()
            );
        }
    }
    Ok(())
}
