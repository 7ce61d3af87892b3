use crate::client::stream::StreamMessage;
use crate::models::{ChatHistory, ChatMessage, ChatRequest, MessageRole};

/// 聊天视图的状态机：消息列表、输入框、加载标志、是否流式。
/// 与界面无关，浏览器端和终端端走同一套状态迁移。
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    input: String,
    busy: bool,
    streaming: bool,
}

impl Transcript {
    pub fn new(streaming: bool) -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            busy: false,
            streaming,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn streaming(&self) -> bool {
        self.streaming
    }

    pub fn set_streaming(&mut self, streaming: bool) {
        self.streaming = streaming;
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// 提交当前输入。空白输入或仍在等待响应时拒绝。
    /// 用户消息先乐观上屏，流式模式下再追加一条空的助手占位消息，
    /// 随后输入框清空、进入等待状态。
    pub fn submit(&mut self) -> Option<ChatRequest> {
        if self.busy || self.input.trim().is_empty() {
            return None;
        }
        let message = std::mem::take(&mut self.input);

        // 历史只带已完成的用户/助手轮次，系统提示类消息不回传
        let history_messages: Vec<ChatMessage> = self
            .messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .cloned()
            .collect();
        let history = if history_messages.is_empty() {
            None
        } else {
            Some(ChatHistory {
                messages: history_messages,
            })
        };

        self.messages
            .push(ChatMessage::new(MessageRole::User, message.clone()));
        if self.streaming {
            self.messages
                .push(ChatMessage::new(MessageRole::Assistant, ""));
        }
        self.busy = true;

        Some(ChatRequest {
            message,
            history,
            stream: self.streaming,
        })
    }

    /// 应用一条流式事件。分片追加到末尾的占位消息上（替换而非新增一条）。
    pub fn apply(&mut self, event: StreamMessage) {
        match event {
            StreamMessage::Chunk(chunk) => {
                if let Some(last) = self.messages.last_mut() {
                    if last.role == MessageRole::Assistant {
                        last.content.push_str(&chunk);
                    }
                }
            }
            StreamMessage::Error(message) => {
                self.messages
                    .push(ChatMessage::new(MessageRole::System, format!("Error: {message}")));
                self.busy = false;
            }
            StreamMessage::End => {
                self.busy = false;
            }
        }
    }

    /// 非流式路径：整条助手回复一次性上屏
    pub fn complete(&mut self, response: &str) {
        self.messages
            .push(ChatMessage::new(MessageRole::Assistant, response));
        self.busy = false;
    }

    /// 任何请求级失败都转成一条系统消息，并恢复可输入状态
    pub fn fail(&mut self, error: &str) {
        self.messages
            .push(ChatMessage::new(MessageRole::System, format!("Error: {error}")));
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_rejected() {
        let mut t = Transcript::new(true);
        t.set_input("   ");
        assert!(t.submit().is_none());
        assert!(t.messages().is_empty());
        assert!(!t.is_busy());
    }

    #[test]
    fn submit_appends_user_and_placeholder() {
        let mut t = Transcript::new(true);
        t.set_input("hello");
        let req = t.submit().unwrap();
        assert_eq!(req.message, "hello");
        assert!(req.stream);
        assert!(req.history.is_none());
        assert_eq!(t.messages().len(), 2);
        assert_eq!(t.messages()[0].role, MessageRole::User);
        assert_eq!(t.messages()[1].role, MessageRole::Assistant);
        assert_eq!(t.messages()[1].content, "");
        assert!(t.is_busy());
        assert_eq!(t.input(), "");
    }

    #[test]
    fn no_placeholder_when_not_streaming() {
        let mut t = Transcript::new(false);
        t.set_input("hello");
        let req = t.submit().unwrap();
        assert!(!req.stream);
        assert_eq!(t.messages().len(), 1);
    }

    #[test]
    fn chunks_accumulate_on_placeholder() {
        let mut t = Transcript::new(true);
        t.set_input("hi");
        t.submit().unwrap();
        t.apply(StreamMessage::Chunk("He".to_string()));
        t.apply(StreamMessage::Chunk("llo".to_string()));
        t.apply(StreamMessage::End);
        assert_eq!(t.messages().last().unwrap().content, "Hello");
        assert!(!t.is_busy());
    }

    #[test]
    fn submit_rejected_while_busy() {
        let mut t = Transcript::new(true);
        t.set_input("hi");
        t.submit().unwrap();
        t.set_input("again");
        assert!(t.submit().is_none());
    }

    #[test]
    fn error_event_becomes_system_message() {
        let mut t = Transcript::new(true);
        t.set_input("hi");
        t.submit().unwrap();
        t.apply(StreamMessage::Error("boom".to_string()));
        let last = t.messages().last().unwrap();
        assert_eq!(last.role, MessageRole::System);
        assert!(last.content.contains("boom"));
        assert!(!t.is_busy());
    }

    #[test]
    fn failure_settles_transcript() {
        let mut t = Transcript::new(false);
        t.set_input("hi");
        t.submit().unwrap();
        t.fail("connection refused");
        assert!(!t.is_busy());
        assert_eq!(t.messages().last().unwrap().role, MessageRole::System);
    }

    #[test]
    fn history_carries_prior_turns_without_system_messages() {
        let mut t = Transcript::new(false);
        t.set_input("first");
        t.submit().unwrap();
        t.complete("answer");
        t.fail("transient");
        t.set_input("second");
        let req = t.submit().unwrap();
        let history = req.history.unwrap();
        assert_eq!(history.messages.len(), 2);
        assert!(history
            .messages
            .iter()
            .all(|m| m.role != MessageRole::System));
    }
}
