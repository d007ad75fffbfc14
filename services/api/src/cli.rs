use crate::server;
use crate::tools::{run_distance, run_radius, DistanceArgs, RadiusArgs};
use clap::{Args, Parser, Subcommand};
use locum_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "locum-match",
    about = "Run the cabinet and substitute-doctor marketplace service or its geo tools",
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
    /// Show how a search radius is normalized for a geocoded place
    Radius(RadiusArgs),
    /// Print the great-circle distance between two points
    Distance(DistanceArgs),
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

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Radius(args) => {
            run_radius(args);
            Ok(())
        }
        Command::Distance(args) => {
            run_distance(args);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["locum-match"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_radius_bounds() {
        let cli = Cli::try_parse_from([
            "locum-match",
            "radius",
            "--types",
            "locality,political",
            "--ne",
            "48.9021449,2.4699208",
            "--sw",
            "48.815573,2.224199",
            "--radius",
            "5",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Radius(args)) => {
                assert_eq!(args.types, vec!["locality", "political"]);
                assert!(args.ne.is_some() && args.sw.is_some());
                assert_eq!(args.radius, 5.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_point() {
        let result = Cli::try_parse_from([
            "locum-match",
            "distance",
            "--from",
            "48.85",
            "--to",
            "45.76,4.83",
        ]);
        assert!(result.is_err());
    }
}
