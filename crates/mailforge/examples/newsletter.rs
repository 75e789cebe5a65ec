//! Builds a small newsletter and writes the message to disk.
//!
//! ```sh
//! cargo run -p mailforge --example newsletter -- out.eml [config.json]
//! ```

use anyhow::{Context, Result};
use mailforge::{
    Config, Container, Document, Image, Leaf, OrderedList, Styled, Table, UnorderedList,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A 1x1 transparent GIF.
const PIXEL: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailforge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "newsletter.eml".to_string());
    let config = match args.next() {
        Some(path) => Config::load(&path).with_context(|| format!("loading {path}"))?,
        None => Config::default(),
    };

    let mut email = Document::new("Project update", "Team <team@example.com>")
        .to("subscribers@example.com")
        .bcc("archive@example.com")
        .with_config(&config);

    email.append(Image::from_bytes(PIXEL, "gif").alt("Project logo").content_id("logo"));
    email.append(Leaf::header("Project update"));
    email.append(Leaf::subheader("March"));
    email.append(
        Container::new()
            .style("color", "#333333")
            .style("padding", "12px")
            .child(Leaf::paragraph("This month we shipped **two** releases:"))
            .child(
                OrderedList::new()
                    .child("Incremental sync")
                    .child(OrderedList::new().child("faster startup").child("less memory"))
                    .child("Offline _search_"),
            )
            .child(Leaf::paragraph("Up next:"))
            .child(UnorderedList::new().child("Calendar invites").child("Signatures")),
    );
    email.append(
        Table::new()
            .style("background-color", "#F5F5F5")
            .child(Leaf::paragraph("Questions? Reply to this e-mail."))
            .child(Image::from_bytes(PIXEL, "gif").alt("footer")),
    );
    email.attach(b"date,downloads\n2024-03-01,1200\n", "text", "csv", Some("stats"));

    print!("{}", email.plain());

    let bytes = email.to_bytes().context("assembling message")?;
    std::fs::write(&output, &bytes).with_context(|| format!("writing {output}"))?;
    info!(
        path = output.as_str(),
        bytes = bytes.len(),
        inline = email.attachments().len(),
        "Newsletter written"
    );
    Ok(())
}
