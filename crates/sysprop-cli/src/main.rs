use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

use sysprop_core::{emit, emit_public_header, load_schema_file, EmitOptions, Error, Result};

/// sysprop: typed system property accessor generator
///
/// Validate sysprop schemas and generate C++ accessors for them.
#[derive(Parser)]
#[command(name = "sysprop", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a schema (syntax + naming and ownership rules)
    Validate {
        /// Path to .sysprop file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the normalized schema as JSON
    Normalize {
        /// Path to .sysprop file
        file: PathBuf,
    },

    /// Generate the C++ header and source for a schema
    Cpp {
        /// Path to .sysprop file
        file: PathBuf,
        /// Directory for the generated header
        #[arg(long)]
        header_dir: PathBuf,
        /// Directory for the generated source
        #[arg(long)]
        source_dir: PathBuf,
        /// Path the source uses to include the header
        #[arg(long)]
        include_name: String,
        /// Directory for a header declaring only Public accessors
        #[arg(long)]
        public_header_dir: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (result, json) = match cli.command {
        Commands::Validate { file, json } => (cmd_validate(&file, json), json),
        Commands::Normalize { file } => (cmd_normalize(&file), false),
        Commands::Cpp {
            file,
            header_dir,
            source_dir,
            include_name,
            public_header_dir,
            json,
        } => {
            let dirs = OutputDirs {
                header: header_dir,
                source: source_dir,
                public_header: public_header_dir,
            };
            (cmd_cpp(&file, &dirs, include_name, json), json)
        }
        Commands::Version => {
            println!(
                "sysprop {} (sysprop-core {})",
                env!("CARGO_PKG_VERSION"),
                sysprop_core::VERSION
            );
            (Ok(()), false)
        }
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(e) => report_error(&e, json),
    };
    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Print `error` and return its exit code: 1 for schema errors, 2 for I/O
fn report_error(error: &Error, json: bool) -> i32 {
    let code = match error {
        Error::Schema(_) => 1,
        Error::Io { .. } => 2,
    };
    if json {
        let report = serde_json::json!({
            "ok": false,
            "kind": if code == 1 { "schema" } else { "io" },
            "error": error.to_string(),
        });
        println!("{}", report);
    }
    eprintln!("{} {}", "error:".red().bold(), error);
    code
}

// ── Commands ──────────────────────────────────────────────

fn cmd_validate(file: &Path, json: bool) -> Result<()> {
    let schema = load_schema_file(file)?;
    if json {
        let report = serde_json::json!({
            "ok": true,
            "module": schema.module,
            "owner": schema.owner,
            "props": schema.props.len(),
        });
        println!("{}", report);
    } else {
        println!(
            "{} {} ({} properties)",
            "valid:".green().bold(),
            schema.module,
            schema.props.len()
        );
    }
    Ok(())
}

fn cmd_normalize(file: &Path) -> Result<()> {
    let schema = load_schema_file(file)?;
    let text = serde_json::to_string_pretty(&schema)
        .map_err(|e| Error::schema(format!("Failed to serialize schema: {}", e)))?;
    println!("{}", text);
    Ok(())
}

struct OutputDirs {
    header: PathBuf,
    source: PathBuf,
    public_header: Option<PathBuf>,
}

fn cmd_cpp(file: &Path, dirs: &OutputDirs, include_name: String, json: bool) -> Result<()> {
    let schema = load_schema_file(file)?;
    let artifacts = emit(&schema, &EmitOptions::new(include_name));

    let basename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::schema(format!("{} does not name a file", file.display())))?;

    let header_path = dirs.header.join(format!("{}.h", basename));
    let source_path = dirs.source.join(format!("{}.cpp", basename));
    let public_path = dirs
        .public_header
        .as_ref()
        .map(|dir| dir.join(format!("{}.h", basename)));

    let mut outputs = vec![
        (header_path.clone(), artifacts.header.clone()),
        (source_path.clone(), artifacts.source.clone()),
    ];
    if let Some(path) = &public_path {
        outputs.push((path.clone(), emit_public_header(&schema)));
    }
    write_outputs(&outputs)?;

    if json {
        let report = serde_json::json!({
            "ok": true,
            "module": schema.module,
            "header": header_path,
            "source": source_path,
            "public_header": public_path,
            "digest": artifacts.digest(),
        });
        println!("{}", report);
    } else {
        for (path, _) in &outputs {
            println!("{} {}", "wrote".green().bold(), path.display());
        }
    }
    Ok(())
}

/// Write every output or none of them.
///
/// Directories are created first and each file is staged as a temporary
/// file beside its target. Targets are only replaced once all staging
/// succeeded; a failed rename removes the targets already renamed.
fn write_outputs(outputs: &[(PathBuf, String)]) -> Result<()> {
    for (path, _) in outputs {
        let dir = parent_dir(path);
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }

    let mut staged = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        staged.push((stage(path, contents)?, path));
    }

    let mut committed: Vec<&Path> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        if let Err(e) = tmp.persist(path) {
            for done in &committed {
                let _ = fs::remove_file(done);
            }
            return Err(Error::io(path, e.error));
        }
        tracing::info!(path = %path.display(), "wrote artifact");
        committed.push(path);
    }
    Ok(())
}

fn stage(path: &Path, contents: &str) -> Result<NamedTempFile> {
    let dir = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| Error::io(tmp.path(), e))?;
    // Temporary files are created owner-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| Error::io(tmp.path(), e))?;
    }
    Ok(tmp)
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}
