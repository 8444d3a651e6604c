//! widget-console - drive a lead widget from the terminal
//!
//! Mounts one widget against a live backend and maps stdin lines onto
//! widget events. Logs go to stderr as JSON; the conversation goes to stdout.

use lead_widget::view::ControlSurface;
use lead_widget::{mount_http, LeadInput, View, WidgetConfig, WidgetHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_widget=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = WidgetConfig::from_env()?;
    let origin = std::env::var("LEAD_WIDGET_ORIGIN").unwrap_or_else(|_| DEFAULT_ORIGIN.to_string());

    let widget = mount_http(&config, &origin)?;
    tracing::info!(widget_id = %widget.widget_id(), origin = %origin, "Widget console ready");
    println!(
        "{} console. /toggle, /quick N, /lead k=v;..., /html, /css, /quit",
        widget.config().brand_name
    );

    let printer = tokio::spawn(print_views(widget.subscribe()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            command => run(&widget, command).await?,
        }
    }

    drop(widget);
    let _ = printer.await;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Toggle,
    Quick(usize),
    Lead(LeadInput),
    Html,
    Css,
    Quit,
    Say(String),
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
        match head {
            "/toggle" => Command::Toggle,
            "/quick" => rest
                .trim()
                .parse()
                .map_or_else(|_| Command::Unknown(line.to_string()), Command::Quick),
            "/lead" => Command::Lead(parse_lead(rest)),
            "/html" => Command::Html,
            "/css" => Command::Css,
            "/quit" => Command::Quit,
            _ if head.starts_with('/') => Command::Unknown(line.to_string()),
            _ => Command::Say(line.to_string()),
        }
    }
}

/// `name=Asha;email=a@b.co;plan=pro` → lead input; unknown keys become extra fields
fn parse_lead(args: &str) -> LeadInput {
    args.split(';')
        .filter_map(|pair| pair.split_once('='))
        .fold(LeadInput::default(), |input, (key, value)| {
            let value = value.trim().to_string();
            match key.trim() {
                "name" => LeadInput { name: value, ..input },
                "email" => LeadInput { email: value, ..input },
                "phone" => input.with_phone(value),
                other => input.with_field(other, value),
            }
        })
}

async fn run(widget: &WidgetHandle, command: Command) -> Result<(), lead_widget::runtime::RuntimeStopped> {
    match command {
        Command::Toggle => widget.toggle().await,
        Command::Quick(index) => widget.choose_quick_reply(index).await,
        Command::Lead(input) => widget.submit_lead(input).await,
        Command::Say(text) => widget.send(text).await,
        Command::Html => {
            println!("{}", widget.render_html());
            Ok(())
        }
        Command::Css => {
            println!("{}", widget.stylesheet());
            Ok(())
        }
        Command::Unknown(line) => {
            println!("? unknown command: {line}");
            Ok(())
        }
        Command::Quit => Ok(()),
    }
}

/// Print transcript additions and control-surface changes as they happen
async fn print_views(mut views: watch::Receiver<View>) {
    let mut printed = 0;
    let mut last_control = ControlSurface::None;
    let mut was_typing = false;

    while views.changed().await.is_ok() {
        let view = views.borrow_and_update().clone();

        for message in view.messages.iter().skip(printed) {
            println!("[{}] {}", message.role.as_str(), message.text);
        }
        printed = view.messages.len();

        if view.typing && !was_typing {
            println!("  ...");
        }
        was_typing = view.typing;

        if view.control != last_control {
            print_control(&view.control);
            last_control = view.control;
        }
    }
}

fn print_control(control: &ControlSurface) {
    match control {
        ControlSurface::None => {}
        ControlSurface::QuickReplies { replies } => {
            for (index, reply) in replies.iter().enumerate() {
                println!("  /quick {index}  {} {}", reply.icon, reply.label);
            }
        }
        ControlSurface::LeadForm { form_type, error } => {
            if let Some(error) = error {
                println!("  ! {error}");
            }
            println!("  form {form_type:?}: /lead name=..;email=..;phone=..;<field>=..");
        }
    }
}
