use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use royalbit_payroll::cli;
use royalbit_payroll::config::{AppConfig, DEFAULT_DATA_DIR};
use royalbit_payroll::error::PayrollResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "payroll")]
#[command(about = "Employee payroll register with Excel import and PDF payslips")]
#[command(long_about = "Payroll - employee wage register

Salary = Hours Worked x Hourly Rate, totals in Indian rupees.

COMMANDS:
  login    - Store the session returned by the login service
  logout   - Forget the stored session
  import   - Replace the register with an Excel (.xlsx) sheet
  add      - Append one employee by hand
  list     - Show the register and its total expense
  clear    - Delete every employee record
  summary  - Payroll summary PDF (all employees)
  payslip  - One payslip PDF per employee
  export   - Register to Excel (.xlsx)
  grid     - Raw sheet viewer: import, show, export, clear

EXAMPLES:
  payroll login response.json
  payroll import employees.xlsx
  payroll add --id E9 --name \"Ravi\" --hours 40 --rate 250
  payroll summary --out-dir reports/
  payroll payslip --id E9

The register and grid require an admin session.")]
#[command(version)]
struct Cli {
    /// Directory holding the durable register, grid and session
    #[arg(long, global = true, env = "PAYROLL_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Directory generated PDFs and exports are written to
    #[arg(long, global = true, env = "PAYROLL_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Store the session returned by the login service.

The file must hold the JSON success body of POST /login:
  {\"token\": \"...\", \"user\": {\"role\": \"Admin\"}}

Role names are case-insensitive.")]
    /// Store a login session
    Login {
        /// Path to the login response JSON
        response: PathBuf,
    },

    /// Forget the stored session
    Logout,

    #[command(long_about = "Replace the register with the first sheet of an .xlsx file.

Row 1 is a header and is ignored. Columns A-D are read as
Employee ID, Name, Hours Worked, Hourly Rate. Rows missing an id or
a name are skipped; non-numeric hours or rates count as 0.

Importing never merges: the previous register is replaced.")]
    /// Import employees from Excel
    Import {
        /// Path to Excel file (.xlsx)
        input: PathBuf,
    },

    /// Add one employee record
    Add {
        /// Employee ID
        #[arg(long)]
        id: String,

        /// Employee name
        #[arg(long)]
        name: String,

        /// Hours worked
        #[arg(long)]
        hours: f64,

        /// Hourly rate
        #[arg(long)]
        rate: f64,
    },

    /// Show the register with salaries and total
    List,

    /// Delete every employee record
    Clear {
        /// Confirm deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate the payroll summary PDF
    Summary,

    #[command(long_about = "Generate payslip PDFs.

Without --id, one payslip is written per employee. With --id, a payslip
is written for every record carrying that id.

Files are named Payslip_<Name>.pdf.")]
    /// Generate payslip PDFs
    Payslip {
        /// Only employees with this id
        #[arg(long)]
        id: Option<String>,

        /// Generation date printed on the payslip (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Export the register to Excel
    Export {
        /// Output file (default: <out-dir>/payroll_register.xlsx)
        output: Option<PathBuf>,
    },

    /// Raw spreadsheet viewer
    Grid {
        #[command(subcommand)]
        command: GridCommands,
    },
}

#[derive(Subcommand)]
enum GridCommands {
    /// Load the first sheet of an .xlsx file verbatim
    Import {
        /// Path to Excel file (.xlsx)
        input: PathBuf,
    },

    /// Print the loaded sheet
    Show,

    /// Write the loaded sheet back out as .xlsx
    Export {
        /// Output file (default: <out-dir>/exported_data.xlsx)
        output: Option<PathBuf>,
    },

    /// Delete the loaded sheet
    Clear {
        /// Confirm deletion
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> PayrollResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("royalbit_payroll=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig {
        data_dir: cli.data_dir,
        out_dir: cli.out_dir,
    };

    match cli.command {
        Commands::Login { response } => cli::login(&config, response),

        Commands::Logout => cli::logout(&config),

        Commands::Import { input } => cli::import(&config, input).await,

        Commands::Add {
            id,
            name,
            hours,
            rate,
        } => cli::add(&config, id, name, hours, rate),

        Commands::List => cli::list(&config),

        Commands::Clear { yes } => cli::clear(&config, yes),

        Commands::Summary => cli::summary(&config).await,

        Commands::Payslip { id, date } => cli::payslip(&config, id, date).await,

        Commands::Export { output } => cli::export(&config, output).await,

        Commands::Grid { command } => match command {
            GridCommands::Import { input } => cli::grid_import(&config, input).await,
            GridCommands::Show => cli::grid_show(&config),
            GridCommands::Export { output } => cli::grid_export(&config, output).await,
            GridCommands::Clear { yes } => cli::grid_clear(&config, yes),
        },
    }
}
