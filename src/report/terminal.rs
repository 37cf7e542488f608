//! Terminal capability detection for status output

use is_terminal::IsTerminal;

use crate::config::ColorMode;

/// Whether to emit ANSI colors on stdout
pub fn color_enabled(mode: ColorMode) -> bool {
    color_enabled_impl(mode, std::io::stdout().is_terminal(), |key| {
        std::env::var(key).ok()
    })
}

/// Whether the locale looks like it can draw the unicode icon set
pub fn unicode_supported() -> bool {
    unicode_supported_impl(|key| std::env::var(key).ok())
}

fn color_enabled_impl(
    mode: ColorMode,
    is_tty: bool,
    get_env: impl Fn(&str) -> Option<String>,
) -> bool {
    match mode {
        ColorMode::Never => false,
        ColorMode::Always => true,
        ColorMode::Auto => {
            let dumb = get_env("TERM")
                .map(|t| t.eq_ignore_ascii_case("dumb"))
                .unwrap_or(false);
            is_tty && !dumb && get_env("NO_COLOR").is_none()
        }
    }
}

fn unicode_supported_impl(get_env: impl Fn(&str) -> Option<String>) -> bool {
    if cfg!(windows) {
        return get_env("WT_SESSION").is_some();
    }
    if get_env("TERM")
        .map(|t| t.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
    {
        return false;
    }
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|key| get_env(key))
        .find(|v| !v.is_empty())
        .map(|v| {
            let v = v.to_lowercase();
            v.contains("utf-8") || v.contains("utf8")
        })
        .unwrap_or(false)
}
