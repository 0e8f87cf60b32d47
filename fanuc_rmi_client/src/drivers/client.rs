use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::driver_config::address;
use super::{connect_with_retry, handshake, RmiConfig, RmiConnection, TelemetryLog};
use crate::commands::*;
use crate::errors::{FrcError, Result};
use crate::instructions::*;
use crate::packets::{Command, Communication, Instruction, Response, SendPacket};
use crate::{Configuration, FrameData, FrameUpdate, JointPose, Position};

/// A session with one robot controller.
///
/// Every method sends one request (three for [`initialize`](Self::initialize))
/// and returns once the matching reply has been read. Replies with a non-zero
/// `ErrorID` come back as [`FrcError::ControllerFault`].
///
/// Motion instructions take a caller-assigned `sequence_id`. The client does
/// not number instructions itself; ids must be positive and unique among the
/// instructions the controller has not yet completed.
///
/// ```rust,ignore
/// let mut client = RmiClient::connect(RmiConfig::new("192.168.1.22", 16001)).await?;
/// client.initialize(0, 1).await?;
/// let pose = client.read_cartesian_position().await?;
/// client
///     .linear_relative(Position::new(0.0, 0.0, 10.0, 0.0, 0.0, 0.0), 50.0, 1, Configuration::default())
///     .await?;
/// client.close().await;
/// ```
pub struct RmiClient {
    config: RmiConfig,
    main_port: u16,
    connection: Option<RmiConnection>,
    telemetry: Option<TelemetryLog>,
}

impl RmiClient {
    /// Handshake on the startup port, then open the main connection.
    pub async fn connect(config: RmiConfig) -> Result<Self> {
        config.validate()?;

        let main_port = handshake(&config).await?;
        // The controller opens the negotiated port shortly after answering.
        sleep(config.startup_pause).await;

        let addr = address(&config.host, main_port);
        let stream = connect_with_retry(
            &addr,
            config.attempts,
            config.retry_delay,
            config.connect_timeout,
        )
        .await?;
        info!(addr = %addr, "connected to robot controller");

        let connection = RmiConnection::new(stream, config.read_timeout, config.write_timeout);
        let telemetry = config.telemetry_log.clone().map(TelemetryLog::new);
        Ok(Self {
            config,
            main_port,
            connection: Some(connection),
            telemetry,
        })
    }

    pub fn config(&self) -> &RmiConfig {
        &self.config
    }

    /// The port carrying traffic, after any reassignment by the handshake.
    pub fn main_port(&self) -> u16 {
        self.main_port
    }

    /// False once [`close`](Self::close) has run. A connection poisoned by an
    /// I/O failure still reports true but refuses requests with `NotConnected`.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn telemetry_log(&self) -> Option<&TelemetryLog> {
        self.telemetry.as_ref()
    }

    /// Send `FRC_Disconnect` if possible and drop the socket. Safe to call twice.
    pub async fn close(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };
        let disconnect = SendPacket::Communication(Communication::FrcDisconnect);
        if let Err(e) = connection.send(&disconnect).await {
            debug!(error = %e, "disconnect not acknowledged");
        }
        connection.shutdown().await;
        info!(peer = %connection.peer(), "disconnected from robot controller");
    }

    async fn send_raw(&self, packet: impl Into<SendPacket>) -> Result<Response> {
        let connection = self.connection.as_ref().ok_or(FrcError::NotConnected)?;
        connection.send(&packet.into()).await
    }

    async fn request(&self, packet: impl Into<SendPacket>) -> Result<Response> {
        self.send_raw(packet).await?.into_result()
    }

    /// Reset, initialize, then select `uframe`/`utool`, stopping at the first failure.
    pub async fn initialize(&self, uframe: u8, utool: u8) -> Result<()> {
        if self.connection.is_none() {
            return Err(FrcError::NotConnected);
        }
        self.request(Command::FrcReset).await?;
        self.request(Command::FrcInitialize(FrcInitialize::default()))
            .await?;
        self.request(Command::FrcSetUFrameUTool(FrcSetUFrameUTool::new(
            uframe, utool,
        )))
        .await?;
        info!(uframe, utool, "controller initialized");
        Ok(())
    }

    pub async fn linear_absolute(
        &self,
        position: Position,
        speed: f64,
        sequence_id: u32,
        configuration: Configuration,
    ) -> Result<Response> {
        let instruction = FrcLinearMotion::new(sequence_id, configuration, position, speed)?;
        self.request(Instruction::FrcLinearMotion(instruction)).await
    }

    pub async fn linear_relative(
        &self,
        offset: Position,
        speed: f64,
        sequence_id: u32,
        configuration: Configuration,
    ) -> Result<Response> {
        let instruction = FrcLinearRelative::new(sequence_id, configuration, offset, speed)?;
        self.request(Instruction::FrcLinearRelative(instruction))
            .await
    }

    pub async fn joint_absolute(
        &self,
        joints: JointPose,
        speed_percent: f64,
        sequence_id: u32,
        configuration: Configuration,
    ) -> Result<Response> {
        let instruction =
            FrcJointMotionJRep::new(sequence_id, configuration, joints, speed_percent)?;
        self.request(Instruction::FrcJointMotionJRep(instruction))
            .await
    }

    pub async fn joint_relative(
        &self,
        offsets: JointPose,
        speed_percent: f64,
        sequence_id: u32,
        configuration: Configuration,
    ) -> Result<Response> {
        let instruction =
            FrcJointRelativeJRep::new(sequence_id, configuration, offsets, speed_percent)?;
        self.request(Instruction::FrcJointRelativeJRep(instruction))
            .await
    }

    /// Set the general override, 0..=100 percent.
    pub async fn speed_override(&self, value: u8) -> Result<Response> {
        let command = FrcSetOverRide::new(value)?;
        self.request(Command::FrcSetOverRide(command)).await
    }

    pub async fn wait_time(&self, seconds: f64, sequence_id: u32) -> Result<Response> {
        let instruction = FrcWaitTime::new(sequence_id, seconds)?;
        self.request(Instruction::FrcWaitTime(instruction)).await
    }

    pub async fn abort(&self) -> Result<Response> {
        self.request(Command::FrcAbort).await
    }

    pub async fn pause(&self) -> Result<Response> {
        self.request(Command::FrcPause).await
    }

    pub async fn resume(&self) -> Result<Response> {
        self.request(Command::FrcContinue).await
    }

    /// Raw `FRC_GetStatus` reply; `decode::<ControllerStatus>()` gives the common fields.
    pub async fn get_status(&self) -> Result<Response> {
        self.request(Command::FrcGetStatus).await
    }

    /// Read the TCP pose. The raw reply is appended to the telemetry log,
    /// faults included, before it is interpreted.
    pub async fn read_cartesian_position(&self) -> Result<CartesianReading> {
        let response = self
            .logged_read(Command::FrcReadCartesianPosition(
                FrcReadCartesianPosition::default(),
            ))
            .await?;
        if response.get("Position").is_none() {
            return Err(FrcError::MissingField("Position"));
        }
        response.decode()
    }

    /// Read joint angles. The raw reply is logged like a Cartesian read.
    pub async fn read_joint_angles(&self) -> Result<JointReading> {
        let response = self
            .logged_read(Command::FrcReadJointAngles(FrcReadJointAngles::default()))
            .await?;
        JointReading::from_response(&response)?.ok_or(FrcError::MissingField("JointAngle"))
    }

    async fn logged_read(&self, command: Command) -> Result<Response> {
        let response = self.send_raw(command).await?;
        if let Some(log) = &self.telemetry {
            if let Err(e) = log.append(response.message()).await {
                warn!(error = %e, "telemetry record lost");
                return Err(e);
            }
        }
        response.into_result()
    }

    pub async fn read_uframe_utool(&self) -> Result<ActiveFrames> {
        self.request(Command::FrcGetUFrameUTool(FrcGetUFrameUTool::default()))
            .await?
            .decode()
    }

    /// Read user frame `frame_number`. Missing components read as `0.0`.
    pub async fn read_uframe_data(&self, frame_number: u8) -> Result<FrameData> {
        let reading: FrameReading = self
            .request(Command::FrcReadUFrameData(FrcReadUFrameData::new(
                frame_number,
            )))
            .await?
            .decode()?;
        Ok(reading.frame)
    }

    /// Write user frame `frame_number`. All six components must be present;
    /// an incomplete record is rejected without touching the connection.
    pub async fn write_uframe_data(
        &self,
        frame_number: u8,
        frame: impl Into<FrameUpdate>,
    ) -> Result<Response> {
        let command = FrcWriteUFrameData::new(frame_number, &frame.into())?;
        self.request(Command::FrcWriteUFrameData(command)).await
    }

    pub async fn read_utool_data(&self, tool_number: u8) -> Result<FrameData> {
        let reading: FrameReading = self
            .request(Command::FrcReadUToolData(FrcReadUToolData::new(tool_number)))
            .await?
            .decode()?;
        Ok(reading.frame)
    }

    pub async fn write_utool_data(
        &self,
        tool_number: u8,
        frame: impl Into<FrameUpdate>,
    ) -> Result<Response> {
        let command = FrcWriteUToolData::new(tool_number, &frame.into())?;
        self.request(Command::FrcWriteUToolData(command)).await
    }
}
