use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_imposition::constants::pt_to_mm;
use pdf_imposition::{ImpositionConfig, ImpositionStatistics, PageImages, SheetSide, TargetNames};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfimp", about = "PDF imposition and placement tools", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the page order and rotations for a layout
    Order {
        /// Number of source pages
        pages: u32,

        /// Pages per sheet side
        #[arg(short, long, default_value = "4")]
        n: usize,

        /// Layout family
        #[arg(long, default_value = "booklet", value_enum)]
        layout: LayoutArg,

        /// Options, e.g. "papersize:A5L, binding:short"
        #[arg(short, long)]
        options: String,

        /// Only order these source pages (comma separated, in order)
        #[arg(long, value_delimiter = ',')]
        select: Vec<u32>,
    },

    /// Impose PDF pages N-up, in reading order
    Nup {
        #[command(flatten)]
        job: ImposeJob,
    },

    /// Impose PDF pages as a saddle-stitched booklet
    Booklet {
        #[command(flatten)]
        job: ImposeJob,
    },

    /// Report where images (or named XObjects) are painted on a page
    Positions {
        /// Input PDF file
        input: PathBuf,

        /// 1-based page number
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Only report these resource names; forms are reported only when named
        #[arg(long, num_args = 1..)]
        names: Vec<String>,
    },

    /// List image XObjects reachable from pages of one or more files
    Images {
        /// Input PDF file(s); with several files a bad one is reported and skipped
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// 1-based pages to list (comma separated); all pages when omitted
        #[arg(short, long, value_delimiter = ',')]
        pages: Vec<u32>,
    },

    /// Replace an image XObject on a page with a JPEG or PNG file
    AlterImage {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Replacement image (JPEG or PNG)
        #[arg(long)]
        image: PathBuf,

        /// 1-based page the image is painted on
        #[arg(short, long)]
        page: u32,

        /// Object number of the image, as printed by `images`
        #[arg(long)]
        object: u32,

        /// Generation number of the image object
        #[arg(long, default_value = "0")]
        generation: u16,
    },
}

#[derive(clap::Args)]
struct ImposeJob {
    /// Input PDF file(s) - can specify multiple
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Output PDF file
    #[arg(short, long, required_unless_present = "stats_only")]
    output: Option<PathBuf>,

    /// Pages per sheet side
    #[arg(short, long, default_value = "4")]
    n: usize,

    /// Options, e.g. "papersize:A4, margin:10, unit:mm"
    #[arg(long, default_value = "papersize:Letter")]
    options: String,

    /// Load the configuration from a JSON file instead of --options
    #[arg(long, conflicts_with = "options")]
    config: Option<PathBuf>,

    /// Write the resolved configuration to a JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Show statistics only, don't generate PDF
    #[arg(long)]
    stats_only: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Nup,
    Booklet,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Order {
            pages,
            n,
            layout,
            options,
            select,
        } => {
            let config = match layout {
                LayoutArg::Nup => ImpositionConfig::nup(n, &options),
                LayoutArg::Booklet => ImpositionConfig::booklet(n, &options),
            }
            .context("Invalid layout options")?;

            let selection: Vec<u32> = if select.is_empty() {
                (1..=pages).collect()
            } else {
                select
            };
            print_order(&selection, &config);
        }

        Commands::Nup { job } => run_impose(job, LayoutArg::Nup).await?,
        Commands::Booklet { job } => run_impose(job, LayoutArg::Booklet).await?,

        Commands::Positions { input, page, names } => {
            let doc = pdf_imposition::load_pdf(&input).await?;
            let targets = if names.is_empty() {
                TargetNames::All
            } else {
                TargetNames::named(names)
            };
            let positions = pdf_imposition::resolve_positions(&doc, page, &targets)?;
            if positions.is_empty() {
                println!("No placements found on page {page}");
            }
            for position in positions {
                println!("/{}: [{}]", position.reference_name, position.matrix);
            }
        }

        Commands::Images { inputs, pages } => {
            if pages.is_empty() {
                log::info!("pages: all");
            }
            let listings = pdf_imposition::list_images_in_files(&inputs, &pages).await?;
            for listing in listings {
                println!("{}", listing.path.display());
                match listing.pages {
                    Ok(pages) => print_images(&pages),
                    Err(e) => println!("  problem processing {}: {e}", listing.path.display()),
                }
            }
        }

        Commands::AlterImage {
            input,
            output,
            image,
            page,
            object,
            generation,
        } => {
            let mut doc = pdf_imposition::load_pdf(&input).await?;
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("Failed to read image: {}", image.display()))?;
            let replacement = pdf_imposition::image_stream_from_bytes(&bytes)?;
            pdf_imposition::alter_image(&mut doc, page, (object, generation), replacement)?;
            pdf_imposition::save_pdf(doc, &output).await?;
            println!("Altered {object} {generation} R → {}", output.display());
        }
    }

    Ok(())
}

async fn run_impose(job: ImposeJob, layout: LayoutArg) -> Result<()> {
    let config = match &job.config {
        Some(path) => ImpositionConfig::load(path)
            .await
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => match layout {
            LayoutArg::Nup => ImpositionConfig::nup(job.n, &job.options),
            LayoutArg::Booklet => ImpositionConfig::booklet(job.n, &job.options),
        }
        .context("Invalid layout options")?,
    };

    if let Some(path) = &job.save_config {
        config.save(path).await?;
        log::info!("saved configuration to {}", path.display());
    }

    // Load all input PDFs
    let documents = pdf_imposition::load_multiple_pdfs(&job.input).await?;
    let source_pages: usize = documents.iter().map(|doc| doc.get_pages().len()).sum();

    // Calculate and show statistics
    let stats = pdf_imposition::calculate_statistics(source_pages, &config)?;
    print_statistics(&stats, &config);

    if job.stats_only {
        return Ok(());
    }
    let Some(output) = job.output else {
        anyhow::bail!("No output file given");
    };

    // Perform imposition
    let imposed = pdf_imposition::impose(&documents, &config).await?;
    pdf_imposition::save_pdf(imposed, &output).await?;
    println!("Imposed → {}", output.display());
    Ok(())
}

fn print_order(selection: &[u32], config: &ImpositionConfig) {
    let order = pdf_imposition::compute_page_order_for(selection, config);
    println!(
        "{}-up {:?}, {}x{} grid, {:?}",
        config.n,
        config.kind,
        config.grid.cols,
        config.grid.rows,
        config.fold_plan()
    );

    for side in order.chunk_by(|a, b| a.sheet_index == b.sheet_index && a.side == b.side) {
        let label = match side[0].side {
            SheetSide::Front => "front",
            SheetSide::Back => "back",
        };
        let cells: Vec<String> = side
            .iter()
            .map(|a| {
                let page = a
                    .source_page
                    .map_or_else(|| "-".to_string(), |p| p.to_string());
                match a.rotation.degrees() {
                    0 => page,
                    degrees => format!("{page}@{degrees}"),
                }
            })
            .collect();
        println!("  sheet {} {label}: {}", side[0].sheet_index + 1, cells.join(" "));
    }
}

fn print_images(pages: &[PageImages]) {
    for listing in pages {
        if listing.images.is_empty() {
            println!("  page {}: no images", listing.page);
            continue;
        }
        for image in &listing.images {
            println!(
                "  page {}: /{} ({} {} R): {}x{} px, {} bpc, {}, {}",
                listing.page,
                image.name,
                image.object_id.0,
                image.object_id.1,
                image.width,
                image.height,
                image
                    .bits_per_component
                    .map_or_else(|| "?".to_string(), |b| b.to_string()),
                image.color_space.as_deref().unwrap_or("unknown colour space"),
                image.filter.as_deref().unwrap_or("unfiltered"),
            );
        }
    }
}

fn print_statistics(stats: &ImpositionStatistics, config: &ImpositionConfig) {
    println!("Imposition Statistics:");
    println!(
        "  Sheet: {} ({:.0} x {:.0} mm)",
        config.paper.name,
        pt_to_mm(config.paper.width),
        pt_to_mm(config.paper.height)
    );
    println!("  Source pages: {}", stats.source_pages);
    println!("  Output sheets: {}", stats.output_sheets);
    println!("  Output pages: {}", stats.output_pages);
    println!("  Blank pages added: {}", stats.blank_pages_added);
    if let Some(sigs) = stats.signatures {
        println!("  Signatures: {}", sigs);
    }
    if let Some(lengths) = &stats.pages_per_signature {
        let lengths: Vec<String> = lengths.iter().map(ToString::to_string).collect();
        println!("  Pages per signature: {}", lengths.join(", "));
    }
}
