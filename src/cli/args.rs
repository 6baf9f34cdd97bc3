use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "qpscrutiniser",
    version,
    about = "question-paper syllabus and textbook validation client",
    long_about = "QP Scrutiniser uploads a syllabus, a question paper and optional textbooks to a scrutiniser server, runs validation and shows every question as a card with its syllabus and textbook verdicts.\n\nExamples:\n  qpscrutiniser -s syllabus.json -q question_paper.json -t textbook.pdf\n  qpscrutiniser -s syllabus.json -q qp.json --filter out --download\n  qpscrutiniser --results validation_results_2026-10-18.json -o report.html\n  qpscrutiniser --demo -s syllabus.json -q qp.json\n\nTip: Use --init-config to write ~/.qpscrutiniser/config.yml and keep the server URL there."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 's',
        long = "syl",
        visible_alias = "syllabus",
        value_name = "FILE",
        help_heading = "Input",
        help = "Syllabus JSON file."
    )]
    pub syllabus: Option<String>,

    #[arg(
        short = 'q',
        long = "qp",
        visible_alias = "question-paper",
        value_name = "FILE",
        help_heading = "Input",
        help = "Question paper JSON file."
    )]
    pub question_paper: Option<String>,

    #[arg(
        short = 't',
        long = "tb",
        visible_alias = "textbook",
        value_name = "FILE",
        action = ArgAction::Append,
        help_heading = "Input",
        help = "Textbook PDF (repeatable)."
    )]
    pub textbook: Vec<String>,

    #[arg(
        short = 'P',
        long = "qpp",
        visible_alias = "question-paper-path",
        value_name = "PATH",
        help_heading = "Input",
        help = "Skip the upload and validate a question paper already stored on the server."
    )]
    pub question_paper_path: Option<String>,

    #[arg(
        short = 'r',
        long = "res",
        visible_alias = "results",
        value_name = "FILE",
        help_heading = "Input",
        help = "Open a previously exported results file instead of contacting the server."
    )]
    pub results: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.qpscrutiniser/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Config",
        help = "Write a default config file (if none exists) and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'S',
        long = "srv",
        visible_alias = "server",
        value_name = "URL",
        help_heading = "Server",
        help = "Scrutiniser server base URL (e.g. http://127.0.0.1:5002)."
    )]
    pub server: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Server",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "Server",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "demo",
        help_heading = "Server",
        help = "Use canned demo responses instead of contacting the server."
    )]
    pub demo: bool,

    #[arg(
        long = "sv",
        visible_alias = "skip-validation",
        help_heading = "Server",
        help = "Upload and process files only; do not run validation."
    )]
    pub skip_validation: bool,

    #[arg(
        short = 'f',
        long = "flt",
        visible_alias = "filter",
        value_name = "STATUS",
        help_heading = "Output",
        help = "Only show cards with this syllabus status (all, in_syllabus, out_of_syllabus, error)."
    )]
    pub filter: Option<String>,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write results to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text, json, html)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'd',
        long = "dl",
        visible_alias = "download",
        help_heading = "Output",
        help = "Export all results to validation_results_<date>.json."
    )]
    pub download: bool,

    #[arg(
        short = 'D',
        long = "dd",
        visible_alias = "download-dir",
        value_name = "DIR",
        help_heading = "Output",
        help = "Directory for the exported results file (defaults to the current directory)."
    )]
    pub download_dir: Option<String>,
}
