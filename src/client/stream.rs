use memchr::memchr;

/// 流式响应里一条已解析的事件
#[derive(Clone, Debug, PartialEq)]
pub enum StreamMessage {
    Chunk(String),
    Error(String),
    End,
}

/// 从字节流里切出完整行，半行留在缓冲区等下一次 push。
#[derive(Debug, Default)]
pub struct LineScanner {
    buffer: Vec<u8>,
}

impl LineScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一段字节，返回其中切出的所有完整行（不含行尾符）
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            match std::str::from_utf8(&self.buffer[..newline_pos]) {
                Ok(s) => lines.push(s.trim_end_matches('\r').to_string()),
                Err(e) => tracing::warn!("流中出现非 UTF-8 行: {}", e),
            }
            self.buffer.drain(..=newline_pos);
        }
        lines
    }
}

/// 解析上游约定的行帧：`data: [DONE]` 结束，`data: [ERROR:...]` 失败，
/// 其余 `data: ` 行是正文分片（分片内部空白原样保留）。
/// 该帧格式是上游 AI 服务的外部契约，这里只识别不发明。
pub fn parse_line(line: &str) -> Option<StreamMessage> {
    let data = line.strip_prefix("data: ")?;
    if data.trim() == "[DONE]" {
        return Some(StreamMessage::End);
    }
    if let Some(rest) = data.trim().strip_prefix("[ERROR:") {
        let message = rest.trim_end_matches(']').trim().to_string();
        return Some(StreamMessage::Error(message));
    }
    Some(StreamMessage::Chunk(data.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_holds_partial_lines() {
        let mut scanner = LineScanner::new();
        assert!(scanner.push(b"data: He").is_empty());
        let lines = scanner.push(b"llo\ndata: wor");
        assert_eq!(lines, vec!["data: Hello"]);
        let lines = scanner.push(b"ld\n");
        assert_eq!(lines, vec!["data: world"]);
    }

    #[test]
    fn scanner_strips_carriage_return() {
        let mut scanner = LineScanner::new();
        let lines = scanner.push(b"data: hi\r\n");
        assert_eq!(lines, vec!["data: hi"]);
    }

    #[test]
    fn parse_done_marker() {
        assert_eq!(parse_line("data: [DONE]"), Some(StreamMessage::End));
    }

    #[test]
    fn parse_error_marker_with_space() {
        // 上游在冒号后会多一个空格
        assert_eq!(
            parse_line("data: [ERROR: boom]"),
            Some(StreamMessage::Error("boom".to_string()))
        );
        assert_eq!(
            parse_line("data: [ERROR:boom]"),
            Some(StreamMessage::Error("boom".to_string()))
        );
    }

    #[test]
    fn parse_chunk_preserves_whitespace() {
        assert_eq!(
            parse_line("data:  spaced "),
            Some(StreamMessage::Chunk(" spaced ".to_string()))
        );
    }

    #[test]
    fn non_data_lines_ignored() {
        assert_eq!(parse_line("event: ping"), None);
        assert_eq!(parse_line(""), None);
    }
}
