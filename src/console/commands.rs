use log::error;

use crate::console::types::{Command, Reply};
use crate::device::Device;
use crate::error::CommandError;
use crate::node_id::{self, namespaces, NodeId};

pub const HELP: &str = "\
connect           connect the remote device
disconnect        disconnect the remote device
start             start mirroring the remote device
status            show device, model and remote state
lookup <name>     show the node id of a standard node
parse <node-id>   parse a node id such as ns=1;i=53
help              show this text
quit              exit";

fn no_argument(command: &str, argument: Option<&str>, result: Command) -> Result<Command, CommandError> {
    match argument {
        None => Ok(result),
        Some(_) => Err(CommandError::UnexpectedArgument { command: command.to_string() }),
    }
}

fn with_argument(command: &str, argument: Option<&str>, make: fn(String) -> Command) -> Result<Command, CommandError> {
    match argument {
        Some(argument) => Ok(make(argument.to_string())),
        None => Err(CommandError::MissingArgument { command: command.to_string() }),
    }
}

/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, argument) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, Some(rest.trim()).filter(|rest| !rest.is_empty())),
        None => (line, None),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "connect" => no_argument(name, argument, Command::Connect)?,
        "disconnect" => no_argument(name, argument, Command::Disconnect)?,
        "start" => no_argument(name, argument, Command::Start)?,
        "status" => no_argument(name, argument, Command::Status)?,
        "help" | "?" => no_argument(name, argument, Command::Help)?,
        "quit" | "exit" => no_argument(name, argument, Command::Quit)?,
        "lookup" => with_argument(name, argument, Command::Lookup)?,
        "parse" => with_argument(name, argument, Command::Parse)?,
        _ => return Err(CommandError::UnknownCommand { command: name.to_string() }),
    };

    Ok(Some(command))
}

fn describe_status(device: &Device) -> String {
    let model = device.model();
    let model_state = if model.loaded() { "loaded" } else { "empty" };

    format!(
        "status: {}, model: {} ({} loads), remote {}: {}",
        device.status(),
        model_state,
        model.load_count(),
        device.remote().name(),
        device.remote().state(),
    )
}

fn describe_node_id(id: &NodeId) -> String {
    let namespace = namespaces::name(id.namespace_index()).unwrap_or("unknown namespace");
    let standard_name = match id.namespace_index() {
        namespaces::STANDARD => id.numeric_id().and_then(node_id::find_name),
        _ => None,
    };

    match standard_name {
        Some(name) => format!("{} ({}, {})", id, namespace, name),
        None => format!("{} ({})", id, namespace),
    }
}

pub fn execute(device: &Device, command: &Command) -> Reply {
    let text = match command {
        Command::Connect => {
            device.remote().connect();
            describe_status(device)
        },
        Command::Disconnect => {
            device.remote().disconnect();
            describe_status(device)
        },
        Command::Start => match device.start() {
            Ok(()) => describe_status(device),
            Err(err) => {
                error!("Failed to start device: {}", err);
                format!("error: {}", err)
            },
        },
        Command::Status => describe_status(device),
        Command::Lookup(name) => match node_id::lookup(name) {
            Some(found) => format!("{} = {}", name, found),
            None => format!("unknown node {:?}", name),
        },
        Command::Parse(text) => match text.parse::<NodeId>() {
            Ok(parsed) => describe_node_id(&parsed),
            Err(err) => format!("error: {}", err),
        },
        Command::Help => HELP.to_string(),
        Command::Quit => return Reply::Quit,
    };

    Reply::Text(text)
}
