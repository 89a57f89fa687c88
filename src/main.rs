use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsift::config::Config;
use docsift::error::DocsiftError;
use docsift::extractor::Extractor;
use docsift::loaders;
use docsift::models::TextRecord;
use docsift::storage::{FileStore, RecordStore, SqliteStore};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(about = "Extract text, hyperlinks, images and tables from office documents")]
struct Args {
    /// Document to extract from (.pdf, .docx, .ppt, .pptx)
    file: PathBuf,

    /// Extract the concatenated document text
    #[arg(long)]
    text: bool,

    /// Extract hyperlink records
    #[arg(long)]
    urls: bool,

    /// Extract embedded images
    #[arg(long)]
    images: bool,

    /// Extract tables
    #[arg(long)]
    tables: bool,

    /// Storage backend for the extracted records
    #[arg(long, value_enum, default_value_t = Backend::Sqlite)]
    backend: Backend,

    /// Database path for the sqlite backend (overrides DOCSIFT_DATABASE_URL)
    #[arg(long)]
    db: Option<String>,

    /// Output directory for the files backend (overrides DOCSIFT_OUTPUT_DIR)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Table name prefix (overrides DOCSIFT_TABLE_PREFIX)
    #[arg(long)]
    prefix: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Sqlite,
    Files,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docsift=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let loader = loaders::loader_for(&args.file).ok_or(DocsiftError::InvalidFormat {
        expected: "PDF, DOCX, PPT or PPTX",
    })?;

    let mut extractor = Extractor::new(loader);
    extractor.load(&args.file)?;
    tracing::info!(file = %args.file.display(), kind = %extractor.kind()?, "document loaded");

    let store: Box<dyn RecordStore> = match args.backend {
        Backend::Sqlite => {
            let url = args.db.unwrap_or(config.database.url);
            tracing::info!(db = %url, "using sqlite storage");
            Box::new(SqliteStore::connect(&url).await?)
        }
        Backend::Files => {
            let dir = args
                .out
                .unwrap_or_else(|| PathBuf::from(&config.output.dir));
            tracing::info!(dir = %dir.display(), "using flat-file storage");
            Box::new(FileStore::new(dir))
        }
    };

    let prefix = args.prefix.unwrap_or(config.table_prefix);
    let everything = !(args.text || args.urls || args.images || args.tables);

    if args.text || everything {
        let text = extractor.extract_text()?;
        tracing::info!(chars = text.len(), "extracted text");
        store
            .store_text(&format!("{prefix}_text"), &TextRecord::new(text))
            .await?;
    }

    if args.urls || everything {
        let urls = extractor.extract_urls()?;
        tracing::info!(count = urls.len(), "extracted hyperlinks");
        store.store_urls(&format!("{prefix}_urls"), &urls).await?;
    }

    if args.images || everything {
        let images = extractor.extract_images()?;
        tracing::info!(count = images.len(), "extracted images");
        store
            .store_images(&format!("{prefix}_images"), &images)
            .await?;
    }

    if args.tables || everything {
        let tables = extractor.extract_tables()?;
        tracing::info!(count = tables.len(), "extracted tables");
        store
            .store_tables(&format!("{prefix}_tables"), &tables)
            .await?;
    }

    store.close().await?;

    Ok(())
}
