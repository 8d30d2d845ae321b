use crate::server;
use clap::{Args, Parser, Subcommand};
use jobdesk::error::AppError;
use jobdesk::portal::matching::compatibility_score;

#[derive(Parser, Debug)]
#[command(
    name = "Job Portal API",
    about = "Run the job portal companion service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute a compatibility score between two skill lists
    Match(MatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Comma-separated skills required by the job
    #[arg(long, value_delimiter = ',')]
    job_skills: Vec<String>,
    /// Comma-separated skills listed by the candidate
    #[arg(long, value_delimiter = ',')]
    candidate_skills: Vec<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Match(args) => run_match(args),
    }
}

fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let job_skills: Vec<String> = args
        .job_skills
        .iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect();
    let candidate_skills: Vec<String> = args
        .candidate_skills
        .iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect();

    let score = compatibility_score(&job_skills, &candidate_skills);

    println!("Job skills:       {}", job_skills.join(", "));
    println!("Candidate skills: {}", candidate_skills.join(", "));
    println!("Compatibility:    {score}%");

    Ok(())
}
