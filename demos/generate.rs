//! Render a markdown page in all three machine-readable variants.
//!
//! Run with: cargo run --example generate [page.md] [source-root]
//!
//! Without arguments a built-in sample page is used. Set `RUST_LOG=debug`
//! to see what the extractors found.

use docs_toon::{PageEntry, PageFormat, Site, ToonOptions};
use std::error::Error;
use std::{env, fs};

const SAMPLE: &str = "\
# Buttons

## Usage
Buttons trigger callbacks when clicked. Use `n_clicks` as the callback input.

.. exec::docs.buttons.basic
    :code: false

## Props

| Prop | Type | Default |
|------|------|---------|
| variant | str | filled |
| size | str | sm |
| disabled | bool | False |

## Quick Start
```python
import dash_mantine_components as dmc
dmc.Button(\"Save\", id=\"save\")
```

## Best Practices
### 1. Label actions clearly
Use verbs such as **Save** or **Delete** rather than **OK**.

## Resources
- [Button reference](https://www.dash-mantine-components.com/components/button)
- **Dash callbacks**: https://dash.plotly.com/basic-callbacks
";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = env::args().skip(1);
    let markdown = match args.next() {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };
    let options = match args.next() {
        Some(root) => ToonOptions::new().with_source_root(root),
        None => ToonOptions::new(),
    };

    let mut site = Site::new("https://docs.example.com").with_options(options);
    site.add_page(
        PageEntry::new("/components/button", "Button").with_description("Clickable actions"),
        markdown,
    );
    site.add_page(PageEntry::new("/components/card", "Card"), "## Card\n");

    for format in [PageFormat::Toon, PageFormat::Markdown, PageFormat::Json] {
        let body = site.render("/components/button", format)?;
        println!("==> /components/button/{} ({} bytes)", format.suffix(), body.len());
        println!("{}\n", body);
    }

    Ok(())
}
