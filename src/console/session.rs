use futures::channel::mpsc::channel;
use futures::StreamExt;
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::config::types::Config;
use crate::console::commands::{execute, parse_command};
use crate::console::types::Reply;
use crate::device::remote::RemoteDevice;
use crate::device::types::DeviceEvent;
use crate::device::Device;
use crate::error::AppRunError;

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), AppRunError> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

/// Builds a remote device and a device from `config` and drives them with commands read line by
/// line from `input` until `quit`, end of input, or `cancel`.
pub async fn run_session<R, W>(config: &Config, input: R, mut output: W, cancel: CancellationToken) -> Result<(), AppRunError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    config.validate()?;

    let (event_sender, mut event_receiver) = channel::<DeviceEvent>(config.event_buffer);
    let remote = RemoteDevice::new(config.remote_name.clone());
    let device = Device::with_senders(remote.clone(), vec![event_sender]);

    if config.connect_on_launch {
        remote.connect();
    }
    if config.start_on_launch {
        device.start()?;
    }

    let mut lines = input.lines();

    'mainloop: loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                break 'mainloop;
            },
            Some(event) = event_receiver.next() => {
                match event {
                    DeviceEvent::StatusChange(status) => info!("Device is now {}", status),
                }
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("End of input");
                    break 'mainloop;
                };

                match parse_command(&line) {
                    Ok(None) => {},
                    Ok(Some(command)) => match execute(&device, &command) {
                        Reply::Quit => break 'mainloop,
                        Reply::Text(text) => write_line(&mut output, &text).await?,
                    },
                    Err(err) => {
                        warn!("Rejected command {:?}: {}", line, err);
                        write_line(&mut output, &format!("error: {}", err)).await?;
                    },
                }
            },
        }
    }

    Ok(())
}
