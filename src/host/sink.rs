use std::io::Write;

use anyhow::{Context, Result};

use super::message::OutboundMessage;

pub trait OutboundSink {
    fn send(&mut self, message: &OutboundMessage) -> Result<()>;
}

pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutboundSink for JsonLinesSink<W> {
    fn send(&mut self, message: &OutboundMessage) -> Result<()> {
        serde_json::to_writer(&mut self.writer, message)
            .context("failed to encode outbound message")?;
        self.writer
            .write_all(b"\n")
            .and_then(|()| self.writer.flush())
            .context("failed to write outbound message")
    }
}

pub struct LogSink;

impl OutboundSink for LogSink {
    fn send(&mut self, message: &OutboundMessage) -> Result<()> {
        match message {
            OutboundMessage::SaveScreenshot { data_uri } => {
                log::info!("screenshot ready ({} bytes encoded)", data_uri.len());
            }
            other => log::info!("host message: {other:?}"),
        }
        Ok(())
    }
}
