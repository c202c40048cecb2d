use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use tracing::info;

use crate::api::{PlanError, build_plan, run_http_server, run_plan};
use crate::core::{Frequency, InvestmentTiming, LenientNumber, RawPlan};
use crate::report::render_report;

#[derive(Parser, Debug)]
#[command(
    name = "futurefund",
    about = "Savings plan projection with target goal solving"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON projection API
    Serve(ServeArgs),
    /// Project a single plan and print the result
    Project(ProjectArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "FUTUREFUND_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(long, env = "FUTUREFUND_PORT", default_value_t = 8080)]
    pub port: u16,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliFrequency {
    Monthly,
    Yearly,
}

impl From<CliFrequency> for Frequency {
    fn from(value: CliFrequency) -> Self {
        match value {
            CliFrequency::Monthly => Frequency::Monthly,
            CliFrequency::Yearly => Frequency::Yearly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliTiming {
    Start,
    End,
}

impl From<CliTiming> for InvestmentTiming {
    fn from(value: CliTiming) -> Self {
        match value {
            CliTiming::Start => InvestmentTiming::Start,
            CliTiming::End => InvestmentTiming::End,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[arg(long, help = "Plan length in years")]
    pub horizon: f64,
    #[arg(long, help = "Desired after-tax final value; omit for no target")]
    pub target: Option<f64>,
    #[arg(long, default_value_t = 0.0)]
    pub initial: f64,
    #[arg(long, default_value_t = 0.0, help = "Contribution per period")]
    pub periodic: f64,
    #[arg(long, value_enum, default_value_t = CliFrequency::Monthly)]
    pub frequency: CliFrequency,
    #[arg(
        long,
        value_enum,
        default_value_t = CliTiming::End,
        help = "Post each contribution before (start) or after (end) that period's growth"
    )]
    pub timing: CliTiming,
    #[arg(long, default_value_t = 0.0, help = "Nominal annual return in percent")]
    pub annual_return: f64,
    #[arg(long, default_value_t = 0.0, help = "Flat tax on gains in percent")]
    pub tax_rate: f64,
    #[arg(long, help = "Annual inflation in percent for today's-money figures")]
    pub inflation_rate: Option<f64>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl ProjectArgs {
    pub fn raw_plan(&self) -> RawPlan {
        RawPlan {
            target_amount: self.target.map(LenientNumber::Number),
            time_horizon: Some(LenientNumber::Number(self.horizon)),
            initial_investment: Some(LenientNumber::Number(self.initial)),
            frequency: Some(self.frequency.into()),
            periodic_investment: Some(LenientNumber::Number(self.periodic)),
            investment_timing: Some(self.timing.into()),
            annual_return: Some(LenientNumber::Number(self.annual_return)),
            tax_rate: Some(LenientNumber::Number(self.tax_rate)),
            inflation_rate: self.inflation_rate.map(LenientNumber::Number),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Serve(args) => {
            let addr = SocketAddr::new(args.host, args.port);
            info!(%addr, "starting server");
            run_http_server(addr).await?;
        }
        Command::Project(args) => {
            println!("{}", project_output(&args)?);
        }
    }
    Ok(())
}

pub fn project_output(args: &ProjectArgs) -> Result<String, CliError> {
    let plan = build_plan(args.raw_plan())?;
    let response = run_plan(plan);
    match args.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => Ok(render_report(
            &response.plan,
            &response.projection,
            &response.metrics,
        )),
    }
}
