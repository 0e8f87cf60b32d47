//! In-process stand-in for a robot controller.
//!
//! The startup listener answers one `FRC_Connect` with the main listener's
//! port; the main listener serves one client and answers every request
//! through a caller-supplied handler.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use fanuc_rmi_client::drivers::RmiConfig;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub enum Reply {
    Json(Value),
    Raw(Vec<u8>),
    Silence,
    Hangup,
}

pub type Handler = Arc<dyn Fn(&Value) -> Reply + Send + Sync>;

pub struct MockController {
    pub startup_port: u16,
    pub main_port: u16,
    received: Arc<Mutex<Vec<Value>>>,
    tasks: Vec<JoinHandle<()>>,
}

impl MockController {
    pub async fn start(handler: Handler) -> Self {
        let main = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let main_port = main.local_addr().unwrap().port();
        Self::start_with(handler, main, json!({
            "Communication": "FRC_Connect",
            "ErrorID": 0,
            "PortNumber": main_port,
        }))
        .await
    }

    /// Start with a custom handshake reply.
    pub async fn start_with(handler: Handler, main: TcpListener, handshake: Value) -> Self {
        let startup = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let startup_port = startup.local_addr().unwrap().port();
        let main_port = main.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));

        let startup_task = tokio::spawn(async move {
            let (socket, _) = startup.accept().await.unwrap();
            let (read, mut write) = socket.into_split();
            let mut lines = BufReader::new(read).lines();
            if let Ok(Some(_)) = lines.next_line().await {
                let mut bytes = serde_json::to_vec(&handshake).unwrap();
                bytes.extend_from_slice(b"\r\n");
                let _ = write.write_all(&bytes).await;
            }
        });

        let log = received.clone();
        let main_task = tokio::spawn(async move {
            let (socket, _) = main.accept().await.unwrap();
            let (read, mut write) = socket.into_split();
            let mut lines = BufReader::new(read).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let request: Value = serde_json::from_str(&line).unwrap();
                log.lock().unwrap().push(request.clone());
                match handler(&request) {
                    Reply::Json(value) => {
                        let mut bytes = serde_json::to_vec(&value).unwrap();
                        bytes.extend_from_slice(b"\r\n");
                        if write.write_all(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Reply::Raw(bytes) => {
                        if write.write_all(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Reply::Silence => {}
                    Reply::Hangup => break,
                }
            }
        });

        Self {
            startup_port,
            main_port,
            received,
            tasks: vec![startup_task, main_task],
        }
    }

    /// Requests seen on the main port, in arrival order.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }

    /// Names of the requests seen on the main port.
    pub fn names(&self) -> Vec<String> {
        self.received()
            .iter()
            .filter_map(|request| packet_name(request).map(|(_, name)| name.to_string()))
            .collect()
    }

    pub fn config(&self) -> RmiConfig {
        test_config(self.startup_port)
    }
}

impl Drop for MockController {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

pub fn test_config(startup_port: u16) -> RmiConfig {
    RmiConfig {
        host: "127.0.0.1".to_string(),
        startup_port,
        main_port: 16002,
        connect_timeout: Duration::from_secs(1),
        write_timeout: Duration::from_secs(1),
        read_timeout: Duration::from_secs(2),
        attempts: 3,
        retry_delay: Duration::from_millis(50),
        startup_pause: Duration::from_millis(10),
        telemetry_log: None,
    }
}

pub fn packet_name(request: &Value) -> Option<(&'static str, &str)> {
    ["Communication", "Command", "Instruction"]
        .into_iter()
        .find_map(|class| request.get(class).and_then(Value::as_str).map(|name| (class, name)))
}

/// Success reply echoing the request's name and sequence id, with canned
/// payloads for the read commands.
pub fn ok_reply(request: &Value) -> Value {
    let Some((class, name)) = packet_name(request) else {
        return json!({"ErrorID": 0});
    };
    let mut reply = json!({});
    reply[class] = json!(name);
    reply["ErrorID"] = json!(0);
    if let Some(id) = request.get("SequenceID") {
        reply["SequenceID"] = id.clone();
    }
    match name {
        "FRC_ReadCartesianPosition" => {
            reply["TimeTag"] = json!(1234);
            reply["Configuration"] = json!({
                "UToolNumber": 1, "UFrameNumber": 0,
                "Front": 1, "Up": 1, "Left": 0, "Flip": 0,
                "Turn4": 0, "Turn5": 0, "Turn6": 0
            });
            reply["Position"] = json!({"X": 500.0, "Y": -20.5, "Z": 300.0, "W": 180.0, "P": 0.0, "R": 90.0});
            reply["Group"] = json!(1);
        }
        "FRC_ReadJointAngles" => {
            reply["TimeTag"] = json!(1235);
            reply["JointAngle"] = json!({"J1": 1.5, "J2": -10.0, "J3": 20.0, "J4": 0.0, "J5": -90.0, "J6": 45.0});
            reply["Group"] = json!(1);
        }
        "FRC_GetUFrameUTool" => {
            reply["UFrameNumber"] = json!(2);
            reply["UToolNumber"] = json!(3);
        }
        _ => {}
    }
    reply
}

pub fn ok_handler() -> Handler {
    Arc::new(|request: &Value| Reply::Json(ok_reply(request)))
}
