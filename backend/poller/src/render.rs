//! # Presentation
//!
//! Category styling, deep links and the markup of the notification dropdown and the
//! backups dropdown.
//!
//! `name`, `message` and `time` come straight from visitors and other users. Every string
//! that lands in markup goes through [`escape_html`] first, attributes included.
use std::borrow::Cow;

use feed::{BackupKind, BackupRecord, Category, NotificationRecord};

pub const INTERNAL_THREAD_PATH: &str = "/dashboard/messages/internal/view/";
pub const MESSAGE_PATH: &str = "/dashboard/messages/view/";
pub const BACKUP_PATH: &str = "/dashboard/backup/";

pub const BADGE_CAP: usize = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub icon: &'static str,
    pub color: &'static str,
}

pub const FALLBACK_STYLE: Style = Style {
    icon: "envelope",
    color: "neutral",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub icon: &'static str,
    pub color: &'static str,
    pub link: String,
}

pub fn style(category: &Category) -> Style {
    match category {
        Category::Portfolio => Style {
            icon: "briefcase",
            color: "gold",
        },
        Category::Internal => Style {
            icon: "comments",
            color: "info",
        },
        Category::Platform => Style {
            icon: "globe",
            color: "primary",
        },
        Category::System => Style {
            icon: "cog",
            color: "warning",
        },
        Category::Other(_) => FALLBACK_STYLE,
    }
}

pub fn deep_link(record: &NotificationRecord) -> String {
    match record.category {
        Category::Internal => format!("{INTERNAL_THREAD_PATH}{}", record.thread()),
        _ => format!("{MESSAGE_PATH}{}", record.id),
    }
}

pub fn present(record: &NotificationRecord) -> Presentation {
    let Style { icon, color } = style(&record.category);

    Presentation {
        icon,
        color,
        link: deep_link(record),
    }
}

pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }

    Cow::Owned(out)
}

/// `None` hides the badge.
pub fn badge_label(count: usize) -> Option<String> {
    match count {
        0 => None,
        n if n > BADGE_CAP => Some(format!("{BADGE_CAP}+")),
        n => Some(n.to_string()),
    }
}

pub fn render_item(record: &NotificationRecord) -> String {
    let Presentation { icon, color, link } = present(record);

    format!(
        concat!(
            r#"<li class="notification-item" data-category="{category}">"#,
            r#"<a href="{link}">"#,
            r#"<i class="fas fa-{icon} text-{color}"></i>"#,
            r#"<div class="notification-body">"#,
            r#"<strong class="notification-name">{name}</strong>"#,
            r#"<p class="notification-message">{message}</p>"#,
            r#"<small class="notification-time">{time}</small>"#,
            "</div></a></li>"
        ),
        category = escape_html(record.category.as_str()),
        link = escape_html(&link),
        icon = icon,
        color = color,
        name = escape_html(&record.name),
        message = escape_html(&record.message),
        time = escape_html(&record.time),
    )
}

/// Full dropdown, snapshot order preserved.
pub fn render_feed(records: &[NotificationRecord]) -> String {
    if records.is_empty() {
        return r#"<li class="notification-empty">No new notifications</li>"#.to_string();
    }

    records.iter().map(render_item).collect()
}

/// Restore and delete are disabled in demo mode, download stays available.
pub fn render_backups(backups: &[BackupRecord], demo_mode: bool) -> String {
    if backups.is_empty() {
        return r#"<li class="backup-empty">No backups yet</li>"#.to_string();
    }

    backups
        .iter()
        .map(|backup| render_backup(backup, demo_mode))
        .collect()
}

fn render_backup(backup: &BackupRecord, demo_mode: bool) -> String {
    let filename = escape_html(&backup.filename);
    let kind = match backup.kind {
        BackupKind::Manual => "manual",
        BackupKind::Automatic => "automatic",
    };

    let destructive = |action: &str, label: &str| {
        if demo_mode {
            format!(
                r#"<button type="button" class="backup-{action}" disabled title="Not available in demo mode">{label}</button>"#
            )
        } else {
            format!(
                r#"<form method="post" action="{BACKUP_PATH}{action}/{filename}"><button type="submit" class="backup-{action}">{label}</button></form>"#
            )
        }
    };

    format!(
        concat!(
            r#"<li class="backup-item" data-type="{kind}">"#,
            r#"<span class="backup-name">{filename}</span>"#,
            r#"<small class="backup-meta">{timestamp} · {size:.2} KB</small>"#,
            r#"<a class="backup-download" href="{path}download/{filename}">Download</a>"#,
            "{restore}{delete}</li>"
        ),
        kind = kind,
        filename = filename,
        timestamp = escape_html(&backup.timestamp),
        size = backup.size_kb,
        path = BACKUP_PATH,
        restore = destructive("restore", "Restore"),
        delete = destructive("delete", "Delete"),
    )
}

#[cfg(test)]
mod tests {
    use feed::RecordId;
    use proptest::prelude::*;

    use super::*;

    fn unescape(input: &str) -> String {
        input
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    fn between<'a>(html: &'a str, open: &str, close: &str) -> &'a str {
        let start = html.find(open).unwrap() + open.len();
        let end = start + html[start..].find(close).unwrap();
        &html[start..end]
    }

    #[test]
    fn test_style_table() {
        assert_eq!(style(&Category::Portfolio).icon, "briefcase");
        assert_eq!(style(&Category::Internal).icon, "comments");
        assert_eq!(style(&Category::Platform).icon, "globe");
        assert_eq!(style(&Category::System).icon, "cog");
    }

    #[test]
    fn test_unknown_category_fallback_is_stable() {
        for raw in ["", "billing", "INTERNAL", "<script>", "system "] {
            let record = NotificationRecord::new(1, Category::from(raw));
            let first = present(&record);

            assert_eq!(first.icon, "envelope");
            assert_eq!(first.color, "neutral");
            assert_eq!(first.link, "/dashboard/messages/view/1");
            assert_eq!(first, present(&record));
        }
    }

    #[test]
    fn test_deep_links() {
        let mut internal = NotificationRecord::new("m2", Category::Internal);
        assert_eq!(deep_link(&internal), "/dashboard/messages/internal/view/m2");

        internal.thread_id = Some(RecordId::from("m1"));
        assert_eq!(deep_link(&internal), "/dashboard/messages/internal/view/m1");

        let portfolio = NotificationRecord::new(5, Category::Portfolio);
        assert_eq!(deep_link(&portfolio), "/dashboard/messages/view/5");

        let platform = NotificationRecord::new(6, Category::Platform);
        assert_eq!(deep_link(&platform), "/dashboard/messages/view/6");

        let system = NotificationRecord::new(7, Category::System);
        assert_eq!(deep_link(&system), "/dashboard/messages/view/7");
    }

    #[test]
    fn test_escape_basic() {
        assert_eq!(escape_html("plain text"), "plain text");
        assert!(matches!(escape_html("plain text"), Cow::Borrowed(_)));
        assert_eq!(
            escape_html(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("Tom & 'Jerry'"), "Tom &amp; &#39;Jerry&#39;");
    }

    #[test]
    fn test_rendered_fields_round_trip() {
        let name = r#"<img src=x onerror="alert(1)">"#;
        let message = "Fish & <b>chips</b> 'tonight' &amp;";
        let record = NotificationRecord::new(1, Category::Portfolio).with_sender(name, message);

        let html = render_item(&record);
        let rendered_name = between(&html, r#"<strong class="notification-name">"#, "</strong>");
        let rendered_message = between(&html, r#"<p class="notification-message">"#, "</p>");

        assert!(!rendered_name.contains('<'));
        assert!(!rendered_message.contains('<'));
        assert_eq!(unescape(rendered_name), name);
        assert_eq!(unescape(rendered_message), message);
    }

    #[test]
    fn test_link_attribute_is_escaped() {
        let record = NotificationRecord::new(r#"1" onclick="x"#, Category::Portfolio);
        let html = render_item(&record);

        assert!(html.contains(r#"href="/dashboard/messages/view/1&quot; onclick=&quot;x""#));
    }

    #[test]
    fn test_render_feed_keeps_order() {
        let records = vec![
            NotificationRecord::new(2, Category::Portfolio).with_sender("B", "second"),
            NotificationRecord::new(1, Category::Internal).with_sender("A", "first"),
        ];

        let html = render_feed(&records);

        assert_eq!(html.matches("notification-item").count(), 2);
        assert!(html.find("second").unwrap() < html.find("first").unwrap());
        assert!(html.contains("fa-briefcase text-gold"));
        assert!(html.contains("fa-comments text-info"));
    }

    #[test]
    fn test_render_empty_feed() {
        assert!(render_feed(&[]).contains("No new notifications"));
    }

    #[test]
    fn test_badge_label() {
        assert_eq!(badge_label(0), None);
        assert_eq!(badge_label(1).as_deref(), Some("1"));
        assert_eq!(badge_label(99).as_deref(), Some("99"));
        assert_eq!(badge_label(100).as_deref(), Some("99+"));
        assert_eq!(badge_label(150).as_deref(), Some("99+"));
    }

    fn backup(filename: &str, kind: BackupKind) -> BackupRecord {
        BackupRecord {
            filename: filename.to_string(),
            timestamp: "2025-03-01T08:00:00".to_string(),
            size_kb: 12.5,
            kind,
        }
    }

    #[test]
    fn test_backups_demo_mode_disables_destructive_actions() {
        let backups = vec![backup("backup_20250301_080000.json", BackupKind::Manual)];

        let html = render_backups(&backups, true);

        assert!(html.contains("/dashboard/backup/download/backup_20250301_080000.json"));
        assert!(!html.contains("/dashboard/backup/restore/"));
        assert!(!html.contains("/dashboard/backup/delete/"));
        assert_eq!(html.matches("disabled").count(), 2);
    }

    #[test]
    fn test_backups_full_mode() {
        let backups = vec![
            backup("a.json", BackupKind::Manual),
            backup("b.json", BackupKind::Automatic),
        ];

        let html = render_backups(&backups, false);

        assert!(html.contains(r#"action="/dashboard/backup/restore/a.json""#));
        assert!(html.contains(r#"action="/dashboard/backup/delete/b.json""#));
        assert!(html.contains(r#"data-type="automatic""#));
        assert!(html.contains("12.50 KB"));
        assert!(!html.contains("disabled"));
    }

    #[test]
    fn test_backups_escape_filename() {
        let html = render_backups(&[backup("<x>.json", BackupKind::Manual)], false);

        assert!(!html.contains("<x>"));
        assert!(html.contains("&lt;x&gt;.json"));
    }

    #[test]
    fn test_backups_empty() {
        assert!(render_backups(&[], false).contains("No backups yet"));
    }

    proptest! {
        #[test]
        fn prop_escape_round_trips(input in any::<String>()) {
            let escaped = escape_html(&input);

            prop_assert!(!escaped.contains(['<', '>', '"', '\'']));
            prop_assert_eq!(unescape(&escaped), input);
        }

        #[test]
        fn prop_rendered_fields_round_trip(name in any::<String>(), message in any::<String>()) {
            let record = NotificationRecord::new(1, Category::Portfolio)
                .with_sender(name.clone(), message.clone());

            let html = render_item(&record);
            let rendered_name = between(&html, r#"<strong class="notification-name">"#, "</strong>");
            let rendered_message = between(&html, r#"<p class="notification-message">"#, "</p>");

            prop_assert_eq!(unescape(rendered_name), name);
            prop_assert_eq!(unescape(rendered_message), message);
        }
    }
}
