//! Demo for the RMI client and the kinematics bridge.
//!
//! ```bash
//! # Talk to a controller (or simulator) at 192.168.1.22
//! RUST_LOG=debug cargo run --bin rmi-demo -- run --host 192.168.1.22
//!
//! # Offline joint -> Cartesian conversion
//! cargo run --bin rmi-demo -- convert --model arm.urdf --from joint --to cartesian \
//!     --values 0,10,-20,0,-45,0
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use fanuc_rmi_client::drivers::{RmiClient, RmiConfig};
use fanuc_rmi_client::kinematics::{convert_coordinates, CoordinateType, PoseData};
use fanuc_rmi_client::{FrcError, JointPose, Position};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rmi-demo")]
#[command(about = "Drive a FANUC controller over RMI and convert poses offline")]
struct Args {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Connect, initialize, nudge the tool up and back, then disconnect.
    Run {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 16001)]
        port: u16,
        /// Vertical offset of the test move, in mm.
        #[arg(long, default_value_t = 10.0)]
        offset: f64,
        /// Linear speed in mm/s.
        #[arg(long, default_value_t = 50.0)]
        speed: f64,
        #[arg(long, default_value = "robot_telemetry.jsonl")]
        telemetry: PathBuf,
    },
    /// Convert a pose between Cartesian and joint space using a URDF model.
    Convert {
        #[arg(long)]
        model: PathBuf,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// X,Y,Z,W,P,R for Cartesian input, J1,J2,... for joint input.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<f64>,
        /// Seed joint angles for the inverse solve.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        seed: Option<Vec<f64>>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let result = match args.command {
        Mode::Run {
            host,
            port,
            offset,
            speed,
            telemetry,
        } => {
            let config = RmiConfig {
                telemetry_log: Some(telemetry),
                ..RmiConfig::new(host, port)
            };
            run(config, offset, speed).await
        }
        Mode::Convert {
            model,
            from,
            to,
            values,
            seed,
        } => convert(model, &from, &to, &values, seed.as_deref()),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: RmiConfig, offset: f64, speed: f64) -> Result<(), FrcError> {
    let mut client = RmiClient::connect(config).await?;
    let outcome = exercise(&client, offset, speed).await;
    client.close().await;
    outcome
}

async fn exercise(client: &RmiClient, offset: f64, speed: f64) -> Result<(), FrcError> {
    client.initialize(0, 1).await?;

    let start = client.read_cartesian_position().await?;
    info!(position = ?start.position, "current TCP pose");

    let up = Position::new(0.0, 0.0, offset, 0.0, 0.0, 0.0);
    let down = Position::new(0.0, 0.0, -offset, 0.0, 0.0, 0.0);
    let configuration = start.configuration.unwrap_or_default();
    client.linear_relative(up, speed, 1, configuration).await?;
    client.wait_time(0.5, 2).await?;
    client.linear_relative(down, speed, 3, configuration).await?;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let joints = client.read_joint_angles().await?;
    for (index, angle) in joints.joints.iter() {
        info!("J{}: {:.3}°", index, angle);
    }
    Ok(())
}

fn convert(
    model: PathBuf,
    from: &str,
    to: &str,
    values: &[f64],
    seed: Option<&[f64]>,
) -> Result<(), FrcError> {
    let data = match from.parse::<CoordinateType>()? {
        CoordinateType::Cartesian => {
            let v = |i: usize| values.get(i).copied().unwrap_or(0.0);
            PoseData::Cartesian(Position::new(v(0), v(1), v(2), v(3), v(4), v(5)))
        }
        CoordinateType::Joint => PoseData::Joint(JointPose::from_slice(values)),
    };
    let seed = seed.map(JointPose::from_slice);

    let converted = convert_coordinates(&data, &model, from, to, seed.as_ref())?;
    let text = serde_json::to_string_pretty(&converted)
        .map_err(|e| FrcError::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
