//! `oschecks` — one-shot health checks for OpenStack clouds.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use oschecks::args::{AuthArgs, CommonArgs};
use oschecks::probes::{
    AmqpArgs, AmqpProbe, CeilometerApiProbe, CephArgs, CephDfProbe, CinderApiProbe,
    GlanceApiProbe, KeystoneProbe, NeutronApiProbe, NovaApiProbe, PacemakerArgs, PacemakerProbe,
    SwiftApiProbe,
};
use oschecks::run_check;

/// Health-check probes for OpenStack services, AMQP, Ceph and Pacemaker.
#[derive(Parser)]
#[command(name = "oschecks")]
#[command(about = "Health-check probes for OpenStack services, AMQP, Ceph and Pacemaker")]
#[command(version)]
struct Cli {
    /// Log probe internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the identity service by issuing a token
    Keystone {
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Check the compute API by listing flavors
    NovaApi {
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Check the block storage API by listing volumes
    CinderApi {
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Check the image API by listing images
    GlanceApi {
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Check the network API by listing networks
    NeutronApi {
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Check the object storage API by listing account containers
    SwiftApi {
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Check the telemetry API by listing meters
    CeilometerApi {
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Check broker queue depth through the RabbitMQ management API
    Amqp {
        #[command(flatten)]
        amqp: AmqpArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Check Ceph cluster health and raw capacity usage
    CephDf {
        #[command(flatten)]
        ceph: CephArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Check Pacemaker cluster status via crm_mon
    Pacemaker {
        #[command(flatten)]
        pacemaker: PacemakerArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
}

fn init_tracing(verbose: bool) {
    // Stdout belongs to the status line; diagnostics go to stderr only.
    let filter = if verbose {
        EnvFilter::new("oschecks=debug,openstack=debug,harness=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "oschecks starting");

    let result = match cli.command {
        Commands::Keystone { auth, common } => {
            run_check(common.check_config(), KeystoneProbe::prepare(auth)).await
        }
        Commands::NovaApi { auth, common } => {
            run_check(common.check_config(), NovaApiProbe::prepare(auth)).await
        }
        Commands::CinderApi { auth, common } => {
            run_check(common.check_config(), CinderApiProbe::prepare(auth)).await
        }
        Commands::GlanceApi { auth, common } => {
            run_check(common.check_config(), GlanceApiProbe::prepare(auth)).await
        }
        Commands::NeutronApi { auth, common } => {
            run_check(common.check_config(), NeutronApiProbe::prepare(auth)).await
        }
        Commands::SwiftApi { auth, common } => {
            run_check(common.check_config(), SwiftApiProbe::prepare(auth)).await
        }
        Commands::CeilometerApi { auth, common } => {
            run_check(common.check_config(), CeilometerApiProbe::prepare(auth)).await
        }
        Commands::Amqp { amqp, common } => {
            run_check(common.check_config(), AmqpProbe::prepare(amqp)).await
        }
        Commands::CephDf { ceph, common } => {
            run_check(common.check_config(), CephDfProbe::prepare(ceph)).await
        }
        Commands::Pacemaker { pacemaker, common } => {
            run_check(common.check_config(), PacemakerProbe::prepare(pacemaker)).await
        }
    };

    result.exit()
}
