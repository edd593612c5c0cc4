//! Theme command for inspecting and changing the stored theme.

use std::io::Write;

use anyhow::{Context, Result};
use smpl_core::Theme;

use crate::ThemeAction;
use crate::theme_store::{ThemeStore, load_or_default};

pub fn run<W: Write>(writer: &mut W, store: &dyn ThemeStore, action: &ThemeAction) -> Result<()> {
    let current = load_or_default(store);

    let updated = match action {
        ThemeAction::Show => None,
        ThemeAction::Next => Some(current.next()),
        ThemeAction::Prev => Some(current.prev()),
        ThemeAction::Set { name } => {
            let theme: Theme = name.parse().with_context(|| {
                let known: Vec<&str> = Theme::ALL.iter().map(|t| t.slug()).collect();
                format!("choose one of: {}", known.join(", "))
            })?;
            Some(theme)
        }
        ThemeAction::List => {
            for theme in Theme::ALL {
                let marker = if theme == current { "*" } else { " " };
                writeln!(writer, "{marker} {:<10} {}", theme.slug(), theme.display_name())?;
            }
            return Ok(());
        }
    };

    let theme = match updated {
        Some(theme) => {
            store.save(theme).context("failed to save theme")?;
            tracing::debug!(from = %current, to = %theme, "theme changed");
            theme
        }
        None => current,
    };
    writeln!(writer, "{} ({})", theme.slug(), theme.display_name())?;
    Ok(())
}
