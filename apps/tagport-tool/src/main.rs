//! CLI tool for porting tag content between schema revisions.
//!
//! Provides commands for:
//! - Listing the fields of a record type at a revision and platform
//! - Porting a JSON record instance between revisions
//! - Dumping a resource xsync-state blob
//! - Picking the closest shader template for an option vector

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tagport_core::chunk::ByteOrder;
use tagport_core::record::RecordInstance;
use tagport_core::resource::load_resource_file;
use tagport_core::schema::{load_catalog, Platform, SchemaKey, SchemaRegistry, SchemaVersion};
use tagport_core::shader::{
    builtin_table, FallbackPolicy, OptionVector, PriorityTable, VariantMatcher, VariantOrdering,
};
use tagport_core::translate::{CollectingSink, StructureTranslator};
use tagport_core::PortConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the fields a record type carries at one revision and platform
    Fields {
        /// Schema catalog (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Record type name
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Schema revision
        #[arg(long, default_value_t = 1)]
        revision: u32,

        /// Target platform
        #[arg(short, long, default_value = "any")]
        platform: Platform,
    },

    /// Port a JSON record instance from one revision to another
    Port {
        /// Schema catalog (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Record type name
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Source revision
        #[arg(long)]
        from: u32,

        /// Destination revision
        #[arg(long)]
        to: u32,

        /// Source platform
        #[arg(long, default_value = "any")]
        from_platform: Platform,

        /// Destination platform
        #[arg(long, default_value = "any")]
        to_platform: Platform,

        /// Source record instance (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also report source fields with no destination counterpart
        #[arg(long)]
        report_unmatched: bool,
    },

    /// Dump the fixup tables of a resource xsync-state blob
    Resource {
        /// Blob file
        input: PathBuf,

        /// Owning resource index
        #[arg(long, default_value_t = 0)]
        owner: u32,

        /// Stream byte order (little or big)
        #[arg(long, default_value = "little")]
        byte_order: ByteOrder,

        /// Maximum chunk nesting depth
        #[arg(long, default_value_t = 8)]
        max_depth: usize,
    },

    /// Pick the closest available template for an option vector
    MatchShader {
        /// Template paths available, one per line
        #[arg(long)]
        templates: PathBuf,

        /// Wanted template name or option list (e.g. _0_1_0_0_1_0_0_0_0_0)
        target: String,

        /// Built-in priority table family
        #[arg(long, default_value = "shader")]
        family: String,

        /// Priority table (JSON) used instead of the built-in one
        #[arg(long)]
        table: Option<PathBuf>,

        /// What to pick when nothing scores at or above the target
        #[arg(long, default_value = "no_match")]
        fallback: FallbackPolicy,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Fields {
            catalog,
            type_name,
            revision,
            platform,
        } => list_fields(&catalog, SchemaKey::new(type_name, SchemaVersion(revision), platform)),
        Commands::Port {
            catalog,
            type_name,
            from,
            to,
            from_platform,
            to_platform,
            input,
            output,
            report_unmatched,
        } => {
            let config = PortConfig {
                report_unmatched,
                ..PortConfig::default()
            };
            let source_key = SchemaKey::new(type_name.clone(), SchemaVersion(from), from_platform);
            let destination_key = SchemaKey::new(type_name, SchemaVersion(to), to_platform);
            port_record(&catalog, &input, output.as_deref(), &source_key, &destination_key, &config)
        }
        Commands::Resource {
            input,
            owner,
            byte_order,
            max_depth,
        } => {
            let config = PortConfig {
                byte_order,
                max_chunk_depth: max_depth,
                ..PortConfig::default()
            };
            dump_resource(&input, owner, &config)
        }
        Commands::MatchShader {
            templates,
            target,
            family,
            table,
            fallback,
        } => {
            let config = PortConfig {
                variant_fallback: fallback,
                ..PortConfig::default()
            };
            match_shader(&templates, &target, &family, table.as_deref(), &config)
        }
    }
}

fn load_registry(catalog: &Path) -> Result<SchemaRegistry> {
    let registry = SchemaRegistry::new();
    let count = load_catalog(catalog, &registry)
        .with_context(|| format!("Failed to load catalog {}", catalog.display()))?;
    tracing::info!("Loaded {} record layouts from {}", count, catalog.display());
    Ok(registry)
}

fn list_fields(catalog: &Path, key: SchemaKey) -> Result<()> {
    let registry = load_registry(catalog)?;
    let fields = registry
        .fields_for(&key)
        .with_context(|| format!("Failed to resolve fields of {}", key))?;

    println!("{} ({} fields)", key, fields.len());
    for field in fields.iter() {
        let mut notes = Vec::new();
        if field.flags.padding {
            notes.push("padding");
        }
        if field.flags.runtime {
            notes.push("runtime");
        }
        if notes.is_empty() {
            println!("  {:<32} {}", field.name, field.kind);
        } else {
            println!("  {:<32} {} [{}]", field.name, field.kind, notes.join(", "));
        }
    }
    Ok(())
}

fn port_record(
    catalog: &Path,
    input: &Path,
    output: Option<&Path>,
    source_key: &SchemaKey,
    destination_key: &SchemaKey,
    config: &PortConfig,
) -> Result<()> {
    let registry = load_registry(catalog)?;

    let contents = fs::read_to_string(input)
        .with_context(|| format!("Failed to read record {}", input.display()))?;
    let source: RecordInstance = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse record {}", input.display()))?;
    if source.type_name() != source_key.type_name {
        bail!(
            "Record {} holds a '{}', not a '{}'",
            input.display(),
            source.type_name(),
            source_key.type_name
        );
    }
    source
        .validate(&registry, source_key)
        .with_context(|| format!("Record does not conform to {}", source_key))?;

    let sink = CollectingSink::new();
    let translator = StructureTranslator::from_config(&registry, &sink, config);
    let ported = translator
        .translate(&source, source_key, destination_key)
        .with_context(|| format!("Failed to port {} to {}", source_key, destination_key))?;

    for event in sink.take() {
        tracing::warn!("{}", event);
    }

    let json = serde_json::to_string_pretty(&ported).context("Failed to serialize record")?;
    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write record {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

fn dump_resource(input: &Path, owner: u32, config: &PortConfig) -> Result<()> {
    let state = load_resource_file(input, owner, config)
        .with_context(|| format!("Failed to load resource {}", input.display()))?;
    if let Err(e) = state.validate() {
        tracing::warn!("Header disagrees with contents: {}", e);
    }

    let header = &state.header;
    println!("owner               {:#010x}", state.owner);
    println!("root address        {:?}", header.root_address);
    println!(
        "cache location      {:#x} (+{:#x})",
        header.cache_location_offset, header.cache_location_size
    );
    println!(
        "optional location   {:#x} (+{:#x})",
        header.optional_location_offset, header.optional_location_size
    );
    println!("control alignment   {} bits", header.control_alignment_bits);
    println!("control data        {} bytes", state.control_data.len());

    for (label, fixups) in [
        ("control", &state.control_fixups),
        ("pageable", &state.pageable_fixups),
        ("optional", &state.optional_fixups),
    ] {
        println!("{} fixups ({})", label, fixups.len());
        for fixup in fixups {
            println!("  {:#010x} -> {:?}", fixup.block_offset, fixup.address);
        }
    }

    println!("interop types ({})", state.interop_types.len());
    for interop in &state.interop_types {
        println!("  {}", interop);
    }
    Ok(())
}

fn match_shader(
    templates: &Path,
    target: &str,
    family: &str,
    table: Option<&Path>,
    config: &PortConfig,
) -> Result<()> {
    let table = match table {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read priority table {}", path.display()))?;
            PriorityTable::from_json(&contents)
                .with_context(|| format!("Invalid priority table {}", path.display()))?
        }
        None => match builtin_table(family) {
            Some(table) => table.with_context(|| format!("Invalid built-in table '{}'", family))?,
            None => bail!("No built-in priority table for family '{}'", family),
        },
    };

    let listing = fs::read_to_string(templates)
        .with_context(|| format!("Failed to read template list {}", templates.display()))?;
    let names = listing.lines().map(str::trim).filter(|line| !line.is_empty());
    let matcher = VariantMatcher::from_template_names(&table, config.variant_fallback, names);
    tracing::info!("{} comparable templates in {}", matcher.len(), templates.display());

    let wanted = OptionVector::from_template_name(target)
        .with_context(|| format!("Invalid target '{}'", target))?;
    let found = matcher
        .find(&wanted)
        .with_context(|| format!("Target '{}' cannot be scored", target))?;

    match found {
        Some((score, options, name)) => {
            println!("{}", name);
            println!("  score   {}", score);
            println!("  options {}", table.describe(options));
        }
        None => println!("no match for {}", wanted.to_template_name(table.family())),
    }
    Ok(())
}
