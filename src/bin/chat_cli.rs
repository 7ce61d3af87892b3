use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use chat_relay::client::{ChatClient, StreamMessage, Transcript};
use chat_relay::models::MessageRole;

/// 终端聊天客户端，走与浏览器前端相同的中继接口
#[derive(Parser, Debug)]
#[command(name = "chat-cli")]
struct Args {
    /// 中继服务地址
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,

    /// 关闭流式输出，等待完整回复
    #[arg(long)]
    no_stream: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = ChatClient::new(&args.url)?;
    let mut transcript = Transcript::new(!args.no_stream);

    println!("已连接 {}（Ctrl-C 中断当前回复，空行退出）", args.url);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = stdin.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            break;
        }

        transcript.set_input(line);
        let Some(request) = transcript.submit() else {
            continue;
        };

        if request.stream {
            let cancel_token = CancellationToken::new();
            let mut rx = client.stream(request, cancel_token.clone());
            loop {
                tokio::select! {
                    event = rx.recv() => {
                        let Some(event) = event else { break };
                        match &event {
                            StreamMessage::Chunk(chunk) => {
                                print!("{chunk}");
                                std::io::stdout().flush()?;
                            }
                            StreamMessage::Error(_) | StreamMessage::End => {}
                        }
                        let done = matches!(event, StreamMessage::End);
                        transcript.apply(event);
                        if done {
                            println!();
                            break;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        cancel_token.cancel();
                        transcript.apply(StreamMessage::End);
                        println!();
                        println!("(已中断)");
                        break;
                    }
                }
            }
        } else {
            match client.send_blocking(&request).await {
                Ok(response) => {
                    println!("{}", response.response);
                    transcript.complete(&response.response);
                }
                Err(e) => transcript.fail(&format!("{e:#}")),
            }
        }

        if let Some(last) = transcript.messages().last() {
            if last.role == MessageRole::System {
                println!("[system] {}", last.content);
            }
        }
    }

    Ok(())
}
