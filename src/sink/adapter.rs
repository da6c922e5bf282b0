// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use crate::encoding::wide_to_utf8;
use crate::record::Record;
use crate::record::WideRecord;
use crate::sink::Sink;

/// Binds one sink to a logger, accepting both UTF-8 and wide records.
///
/// Wide text that cannot be converted is replaced by an empty string, so a sink never sees
/// garbage and one adapter call performs at most one sink write.
#[derive(Debug, Clone)]
pub struct SinkAdapter {
    sink: Arc<dyn Sink>,
}

impl SinkAdapter {
    /// Wrap a sink.
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }

    /// The wrapped sink.
    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    /// Whether the wrapped sink is open.
    pub fn is_open(&self) -> bool {
        self.sink.is_open()
    }

    /// Forward a record to the sink.
    pub fn consume(&self, record: &Record) {
        self.sink.consume(record);
    }

    /// Convert a wide record and forward it to the sink.
    pub fn consume_wide(&self, record: &WideRecord) {
        self.sink.consume(&narrow(record));
    }
}

fn narrow(record: &WideRecord) -> Record {
    let convert = |wide: &[u16]| wide_to_utf8(wide).unwrap_or_default();

    let mut builder = Record::builder()
        .time(record.time())
        .level(record.level())
        .thread_id(record.thread_id())
        .payload(convert(record.payload()));
    if let Some(location) = record.location() {
        builder = builder.location(
            convert(&location.file),
            location.line,
            convert(&location.function),
        );
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::utf8_to_wide;
    use crate::layout::CustomLayout;
    use crate::record::Level;
    use crate::sink::SinkOptions;
    use crate::sink::testkit::Memory;

    fn memory() -> Arc<Memory> {
        let layout = CustomLayout::new(|record: &Record, _: bool| {
            let location = record
                .location()
                .map(|l| format!(" @{}:{}:{}", l.file(), l.line(), l.function()))
                .unwrap_or_default();
            Ok(format!(
                "#{} {} [{}]{location}",
                record.thread_id(),
                record.level(),
                record.payload()
            ))
        });
        Arc::new(Memory::with_options(
            SinkOptions::default().with_layout(layout),
        ))
    }

    #[test]
    fn test_wide_record_is_converted() {
        let sink = memory();
        let adapter = SinkAdapter::new(sink.clone());
        assert!(adapter.is_open());

        let record = WideRecord::builder()
            .level(Level::Warn)
            .thread_id(12)
            .payload(utf8_to_wide("温度过高"))
            .location(utf8_to_wide("src/sensor.rs"), 30, utf8_to_wide("sensor::poll"))
            .build();
        adapter.consume_wide(&record);
        adapter.consume(&Record::builder().thread_id(12).payload("plain").build());

        assert_eq!(
            sink.lines(),
            vec![
                "#12 WARN [温度过高] @src/sensor.rs:30:sensor::poll",
                "#12 INFO [plain]",
            ]
        );
    }

    #[test]
    fn test_malformed_wide_text_becomes_empty() {
        let sink = memory();
        let adapter = SinkAdapter::new(sink.clone());

        let record = WideRecord::builder()
            .level(Level::Error)
            .thread_id(1)
            .payload(vec![0xdc00, 0x0041])
            .build();
        adapter.consume_wide(&record);

        assert_eq!(sink.lines(), vec!["#1 ERROR []"]);
    }
}
