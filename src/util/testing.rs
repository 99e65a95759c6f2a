use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Node, Tree};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Build a payload-free tree from its outline, e.g. `root[a[b, c], d]`.
///
/// This is the inverse of [`Tree::outline`]. Ids may contain anything but
/// brackets, commas and whitespace.
pub fn tree_from_outline(outline: &str) -> Result<Tree<()>, String> {
    let mut open: Vec<Node<()>> = Vec::new();
    let mut last: Option<Node<()>> = None;
    let mut chars = outline.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '[' => {
                chars.next();
                let node = last.take().ok_or("'[' without a node before it")?;
                open.push(node);
            }
            ',' => {
                chars.next();
                let node = last.take().ok_or("',' without a node before it")?;
                let parent = open.last_mut().ok_or("',' outside of a child list")?;
                parent.children.push(node);
            }
            ']' => {
                chars.next();
                let mut parent = open.pop().ok_or("unbalanced ']'")?;
                if let Some(node) = last.take() {
                    parent.children.push(node);
                }
                last = Some(parent);
            }
            _ => {
                if last.is_some() {
                    return Err(format!("missing ',' before '{c}'"));
                }
                let mut id = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '[' | ']' | ',') {
                        break;
                    }
                    id.push(c);
                    chars.next();
                }
                last = Some(Node::new(id, ()));
            }
        }
    }

    if !open.is_empty() {
        return Err("unclosed '['".to_string());
    }
    let root = last.ok_or("empty outline")?;
    Tree::new(root).map_err(|e| e.to_string())
}
