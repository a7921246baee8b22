//! In-memory [`PoolGateway`] used by unit tests.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use crate::address::{host_of, NodeAddress};
use crate::error::{RecycleError, Result};
use crate::gateway::{PoolGateway, ProgressStream};
use crate::report::{Channel, MemoryReporter, Pause, Reporter};
use crate::types::{Machine, MachineMetadata, Metadata, Node, Template};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListNodes,
    ListTemplates,
    Create(String),
    AddNode(String),
    Deregister(String),
    Move(String, String),
    Decommission(String),
}

enum MoveScript {
    Lines(Vec<String>),
    Broken(Vec<String>, String),
}

#[derive(Default)]
struct State {
    nodes: Vec<Node>,
    machines: Vec<Machine>,
    templates: Vec<String>,
    new_nodes: VecDeque<String>,
    moves: VecDeque<MoveScript>,
    move_failure: Option<String>,
    create_failure: Option<String>,
    deregister_failure: Option<String>,
    decommission_failure: Option<String>,
    calls: Vec<Call>,
}

pub struct FakePool {
    state: Mutex<State>,
}

impl FakePool {
    pub fn new(nodes: &[&str], templates: &[&str]) -> Self {
        let state = State {
            nodes: nodes
                .iter()
                .map(|a| {
                    let mut n = Node::new(*a);
                    n.metadata.insert("pool".into(), "foobar".into());
                    n
                })
                .collect(),
            machines: nodes
                .iter()
                .enumerate()
                .map(|(i, a)| Machine {
                    id: format!("m-{i}"),
                    iaas: "cloudstack".into(),
                    status: "running".into(),
                    address: host_of(a).to_string(),
                    creation_params: Metadata::new(),
                })
                .collect(),
            templates: templates.iter().map(|t| t.to_string()).collect(),
            ..State::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn with_new_nodes(self, addresses: &[&str]) -> Self {
        self.state.lock().unwrap().new_nodes = addresses.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Queue the lines returned by the next `move_containers` call.
    pub fn push_move(&self, lines: &[&str]) {
        self.state
            .lock()
            .unwrap()
            .moves
            .push_back(MoveScript::Lines(lines.iter().map(|l| l.to_string()).collect()));
    }

    /// Queue a stream that yields `lines` and then breaks with `error`.
    pub fn push_broken_move(&self, lines: &[&str], error: &str) {
        self.state.lock().unwrap().moves.push_back(MoveScript::Broken(
            lines.iter().map(|l| l.to_string()).collect(),
            error.to_string(),
        ));
    }

    pub fn fail_moves_with(&self, message: &str) {
        self.state.lock().unwrap().move_failure = Some(message.to_string());
    }

    pub fn fail_create_with(&self, message: &str) {
        self.state.lock().unwrap().create_failure = Some(message.to_string());
    }

    pub fn fail_deregister_with(&self, message: &str) {
        self.state.lock().unwrap().deregister_failure = Some(message.to_string());
    }

    pub fn fail_decommission_with(&self, message: &str) {
        self.state.lock().unwrap().decommission_failure = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn move_calls(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Move(from, to) => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    /// Calls that change backend state.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::ListNodes | Call::ListTemplates))
            .collect()
    }

    pub fn node_addresses(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .nodes
            .iter()
            .map(|n| n.address.clone())
            .collect()
    }

    pub fn machine_addresses(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .machines
            .iter()
            .map(|m| m.address.clone())
            .collect()
    }
}

impl PoolGateway for FakePool {
    fn list_nodes(&self, pool: &str) -> Result<Vec<Node>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListNodes);
        Ok(state
            .nodes
            .iter()
            .filter(|n| n.pool() == Some(pool))
            .cloned()
            .collect())
    }

    fn list_machines(&self) -> Result<Vec<Machine>> {
        Ok(self.state.lock().unwrap().machines.clone())
    }

    fn list_templates(&self, _pool: &str) -> Result<Vec<Template>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListTemplates);
        Ok(state.templates.iter().map(Template::new).collect())
    }

    fn create_node(&self, pool: &str, template: &Template) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(template.name.clone()));
        if let Some(message) = &state.create_failure {
            return Err(RecycleError::NewNodeProvision(message.clone()));
        }
        let next = state.nodes.len() + state.new_nodes.len() + 100;
        let address = state
            .new_nodes
            .pop_front()
            .unwrap_or_else(|| format!("http://10.0.0.{next}:4243"));
        let mut node = Node::new(address.clone());
        node.metadata.insert("pool".into(), pool.to_string());
        state.nodes.push(node);
        state.machines.push(Machine {
            id: format!("new-{next}"),
            iaas: "cloudstack".into(),
            status: "running".into(),
            address: host_of(&address).to_string(),
            creation_params: Metadata::new(),
        });
        Ok(address)
    }

    fn add_node(&self, pool: &str, address: &NodeAddress, metadata: &Metadata) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::AddNode(address.to_string()));
        let mut node = Node::new(address.to_string());
        node.metadata = metadata.clone();
        node.metadata.insert("pool".into(), pool.to_string());
        state.nodes.push(node);
        Ok(())
    }

    fn deregister_node(&self, address: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Deregister(address.to_string()));
        if let Some(message) = &state.deregister_failure {
            return Err(RecycleError::NodeDeregistration(message.clone()));
        }
        let before = state.nodes.len();
        state.nodes.retain(|n| n.address != address);
        if state.nodes.len() == before {
            return Err(RecycleError::NodeDeregistration(format!(
                "no such node in storage: {address}"
            )));
        }
        Ok(())
    }

    fn decommission_machine(&self, address: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Decommission(address.to_string()));
        if let Some(message) = &state.decommission_failure {
            return Err(RecycleError::MachineDecommission(message.clone()));
        }
        let host = host_of(address).to_string();
        let before = state.machines.len();
        state.machines.retain(|m| m.address != host);
        if state.machines.len() == before {
            return Err(RecycleError::MachineDecommission(format!(
                "machine {host} not found on IaaS"
            )));
        }
        Ok(())
    }

    fn move_containers(&self, from: &NodeAddress, to: &NodeAddress) -> Result<ProgressStream<'_>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Move(from.to_string(), to.to_string()));
        if let Some(message) = &state.move_failure {
            return Err(RecycleError::Backend(message.clone()));
        }
        let items: Vec<Result<String>> = match state.moves.pop_front() {
            Some(MoveScript::Lines(lines)) => lines.into_iter().map(Ok).collect(),
            Some(MoveScript::Broken(lines, error)) => lines
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(RecycleError::Backend(error))))
                .collect(),
            None => vec![Ok("Container moved successfully".to_string())],
        };
        Ok(Box::new(items.into_iter()))
    }

    fn node_metadata(&self, address: &str) -> Result<Option<Metadata>> {
        let host = host_of(address);
        Ok(self
            .state
            .lock()
            .unwrap()
            .nodes
            .iter()
            .find(|n| host_of(&n.address) == host)
            .map(|n| n.metadata.clone()))
    }

    fn machine_metadata(&self, address: &str) -> Result<Option<MachineMetadata>> {
        let host = host_of(address);
        Ok(self
            .state
            .lock()
            .unwrap()
            .machines
            .iter()
            .find(|m| m.address == host)
            .map(MachineMetadata::from))
    }
}

/// Records requested waits instead of sleeping.
#[derive(Default)]
pub struct RecordingPause {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingPause {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

impl Pause for RecordingPause {
    fn pause(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Accepts `limit` lines, then fails every write the way a closed pipe does.
pub struct ClosingReporter {
    pub written: MemoryReporter,
    limit: usize,
}

impl ClosingReporter {
    pub fn after(limit: usize) -> Self {
        Self {
            written: MemoryReporter::new(),
            limit,
        }
    }

    fn write(&mut self, channel: Channel, line: &str) -> io::Result<()> {
        if self.written.events.len() >= self.limit {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.written.events.push((channel, line.to_string()));
        Ok(())
    }
}

impl Reporter for ClosingReporter {
    fn progress(&mut self, line: &str) -> io::Result<()> {
        self.write(Channel::Stdout, line)
    }

    fn error(&mut self, line: &str) -> io::Result<()> {
        self.write(Channel::Stderr, line)
    }
}
