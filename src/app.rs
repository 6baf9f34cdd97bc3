use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use tokio::time::Instant;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::client::{self, Backend, ClientOptions, ScrutinyClient, UploadForm};
use crate::config::{self, ConfigFile};
use crate::filter::StatusFilter;
use crate::output::{self, OutputFormat};
use crate::session::{self, Session};
use crate::utils::{self, Level};

const BANNER: &str = r#"
                                    __  _       _
   ____ _____     ___________________  __/ /_(_)___  (_)_______  _____
  / __ `/ __ \   / ___/ ___/ ___/ / / / __/ / __ \/ / ___/ _ \/ ___/
 / /_/ / /_/ /  (__  ) /__/ /  / /_/ / /_/ / / / / (__  )  __/ /
 \__, / .___/  /____/\___/_/   \__,_/\__/_/_/ /_/_/____/\___/_/
   /_/_/
       question paper syllabus & textbook validation
"#;

fn print_banner(no_color: bool) {
    if no_color {
        print!("{}", BANNER);
    } else {
        let _ = write!(&mut rainbowcoat::stdout(), "{}", BANNER);
    }
    println!();
}

fn print_kv(label: &str, value: &str) {
    println!("{}", utils::format_kv_line(label, value));
}

fn apply_color_choice(no_color: bool, force_color: bool) {
    colored::control::unset_override();
    if force_color {
        colored::control::set_override(true);
    } else if no_color {
        colored::control::set_override(false);
    }
}

#[derive(Clone, Debug)]
enum RunMode {
    Upload(UploadForm),
    Existing(String),
    Results(PathBuf),
}

impl RunMode {
    fn label(&self) -> &'static str {
        match self {
            RunMode::Upload(_) => "upload + validate",
            RunMode::Existing(_) => "validate stored paper",
            RunMode::Results(_) => "saved results",
        }
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    mode: RunMode,
    client: ClientOptions,
    demo: bool,
    skip_validation: bool,
    filter: StatusFilter,
    output: Option<String>,
    output_format: Option<OutputFormat>,
    download: bool,
    download_dir: PathBuf,
    no_color: bool,
    force_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let force_color = args.color;
    let no_color = !force_color && (args.no_color || cfg.no_color.unwrap_or(false));

    let server = args
        .server
        .or(cfg.server)
        .unwrap_or_else(|| client::DEFAULT_SERVER.to_string());
    let timeout_seconds = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(client::DEFAULT_TIMEOUT_SECONDS);
    if timeout_seconds == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());
    let demo = args.demo || cfg.demo.unwrap_or(false);

    let filter_raw = args
        .filter
        .or(cfg.filter)
        .unwrap_or_else(|| "all".to_string());
    let filter = StatusFilter::parse(&filter_raw)
        .map_err(|e| format!("invalid filter '{filter_raw}': {e}"))?;

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => Some(
            OutputFormat::parse(&raw)
                .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or html"))?,
        ),
        None => None,
    };

    let download = args.download || cfg.download.unwrap_or(false);
    let download_dir = args
        .download_dir
        .or(cfg.download_dir)
        .map(|p| config::expand_tilde(&p))
        .unwrap_or_else(|| PathBuf::from("."));

    let has_upload_files =
        args.syllabus.is_some() || args.question_paper.is_some() || !args.textbook.is_empty();
    let question_paper_path = args
        .question_paper_path
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    let mode = if let Some(results) = args.results {
        RunMode::Results(config::expand_tilde(&results))
    } else if let Some(path) = question_paper_path {
        if has_upload_files {
            return Err("use either upload files or --question-paper-path, not both".to_string());
        }
        if args.skip_validation {
            return Err("--skip-validation has nothing to do with --question-paper-path".to_string());
        }
        RunMode::Existing(path)
    } else if has_upload_files {
        RunMode::Upload(UploadForm {
            syllabus: args.syllabus.map(|p| config::expand_tilde(&p)),
            question_paper: args.question_paper.map(|p| config::expand_tilde(&p)),
            textbooks: args.textbook.iter().map(|p| config::expand_tilde(p)).collect(),
        })
    } else {
        return Err(
            "at least one input mode must be specified (--syllabus/--question-paper, --question-paper-path, or --results)"
                .to_string(),
        );
    };

    Ok(RunConfig {
        mode,
        client: ClientOptions {
            server,
            timeout_seconds,
            proxy,
        },
        demo,
        skip_validation: args.skip_validation,
        filter,
        output,
        output_format,
        download,
        download_dir,
        no_color,
        force_color,
        verbose: args.verbose,
    })
}

fn print_run_config(run: &RunConfig, backend: &Backend) {
    print_kv("Mode", run.mode.label());
    print_kv("Server", &backend.describe());
    print_kv("Timeout", &format!("{}s", run.client.timeout_seconds));
    print_kv(
        "Proxy",
        utils::format_opt_value(run.client.proxy.as_deref(), "none"),
    );
    match &run.mode {
        RunMode::Upload(form) => {
            let show = |p: &Option<PathBuf>| {
                p.as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string())
            };
            print_kv("Syllabus", &show(&form.syllabus));
            print_kv("Paper", &show(&form.question_paper));
            print_kv("Textbooks", &form.textbooks.len().to_string());
        }
        RunMode::Existing(path) => print_kv("Paper", path),
        RunMode::Results(path) => print_kv("Results", &path.display().to_string()),
    }
    print_kv("Filter", &run.filter.to_string());
    print_kv(
        "Output",
        utils::format_opt_value(run.output.as_deref(), "none"),
    );
    if run.download {
        print_kv("Export", &run.download_dir.display().to_string());
    }
    println!();
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("failed to create directory '{}': {e}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| format!("failed to write '{}': {e}", path.display()))
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    apply_color_choice(run.no_color, run.force_color);
    print_banner(run.no_color);

    let started = Instant::now();

    let backend = if run.demo {
        Backend::Demo
    } else {
        Backend::Http(ScrutinyClient::new(&run.client).map_err(|e| e.to_string())?)
    };
    if run.verbose > 0 {
        print_run_config(&run, &backend);
    }
    let mut session = Session::new(backend);

    match &run.mode {
        RunMode::Results(path) => {
            let results = session::load_results_file(path).await?;
            utils::print_status(
                Level::Info,
                &format!("Loaded {} results from {}", results.len(), path.display()),
            );
            session.replace_results(results);
        }
        RunMode::Existing(path) => session.set_question_paper_path(path.clone()),
        RunMode::Upload(form) => {
            let pb = utils::spinner("Uploading and processing files...");
            let uploaded = session.handle_upload(form).await;
            pb.finish_and_clear();
            let summary = uploaded.map_err(|e| e.to_string())?;
            utils::print_status(
                Level::Ok,
                &format!(
                    "Files processed successfully! Syllabus documents: {}, Textbook documents: {}",
                    summary.syllabus_docs, summary.textbook_docs
                ),
            );
            if run.verbose > 0 {
                print_kv("Stored at", &summary.question_paper_path);
            }
        }
    }

    if run.skip_validation {
        utils::print_status(
            Level::Info,
            &format!(
                "Skipping validation; question paper stored at {}",
                session.question_paper_path().unwrap_or("-")
            ),
        );
        return Ok(());
    }

    if !matches!(run.mode, RunMode::Results(_)) {
        let pb = utils::spinner("Processing questions...");
        let validated = session.start_validation().await.map(|r| r.len());
        pb.finish_and_clear();
        let count = validated.map_err(|e| e.to_string())?;
        utils::print_status(Level::Ok, &format!("Validated {count} questions"));
    }

    let stats = session.summary();
    println!();
    print!("{}", output::render_summary(&stats));

    let visible = session.visible(&run.filter);
    if run.filter != StatusFilter::All {
        print_kv(
            "Showing",
            &format!("{} of {} ({})", visible.len(), stats.total, run.filter),
        );
    }
    for result in visible.iter() {
        println!();
        print!("{}", output::render_card(result));
        if run.verbose > 1 {
            for (key, value) in result.extra.iter() {
                println!("    {}", utils::format_kv_line(key, &value.to_string()).as_str().dimmed());
            }
        }
    }
    println!();

    if let Some(outfile_path) = run.output.as_ref() {
        let output_format = run
            .output_format
            .or_else(|| output::infer_format_from_path(outfile_path))
            .unwrap_or(OutputFormat::Text);

        // files never carry ANSI escapes
        colored::control::set_override(false);
        let rendered = match output_format {
            OutputFormat::Text => output::render_text(&visible, &stats),
            OutputFormat::Json => {
                let owned: Vec<_> = visible.iter().map(|r| (*r).clone()).collect();
                output::render_json(&owned)
            }
            OutputFormat::Html => output::render_html(session.results(), &stats),
        };
        apply_color_choice(run.no_color, run.force_color);

        write_file(Path::new(outfile_path), &rendered).await?;
        utils::print_status(Level::Ok, &format!("Results written to {outfile_path}"));
    }

    if run.download {
        let path = run.download_dir.join(session::default_export_file_name());
        let mut json = session
            .export_json()
            .map_err(|e| format!("failed to serialize results: {e}"))?;
        json.push('\n');
        write_file(&path, json.as_bytes()).await?;
        utils::print_status(
            Level::Ok,
            &format!("Results exported to {}", path.display()),
        );
    }

    println!(
        ":: Completed :: took {}s ::",
        started.elapsed().as_secs().to_string().as_str().bold()
    );
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let explicit_config = args.config.clone().map(|p| config::expand_tilde(&p));

    if args.init_config {
        let path = explicit_config
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine home directory for config".to_string())?;
        if config::ensure_default_config_file(&path)? {
            utils::print_status(Level::Ok, &format!("Wrote config to {}", path.display()));
        } else {
            utils::print_status(
                Level::Info,
                &format!("Config already exists at {}", path.display()),
            );
        }
        return Ok(());
    }

    let cfg = match explicit_config.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
