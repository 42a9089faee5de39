//! Handling of events sent by background tasks.

use crate::app::{App, AppEvent};

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FeedsRefreshed { count } => {
            app.screen.data_refreshed();
            if app.refreshing {
                app.refreshing = false;
                app.set_status(format!("Reloaded {} feeds", count));
            }
        }
        AppEvent::RefreshFailed { error } => {
            app.refreshing = false;
            app.set_error(format!("Error: reload failed: {}", error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Feed, SharedFeeds};
    use crate::keybindings::KeybindingRegistry;
    use crate::screen::{NoticeLevel, ScreenController, ScreenSettings, StatusSink};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_refresh_event_rebuilds_projection() {
        let shared = SharedFeeds::new(vec![Feed::new("a")]);
        let notices = StatusSink::new();
        let screen = ScreenController::new(
            Arc::new(shared.clone()),
            ScreenSettings::default(),
            Arc::new(notices.clone()),
        );
        let (tx, _rx) = mpsc::channel(1);
        let mut app = App::new(screen, notices, KeybindingRegistry::new(), tx);
        app.refreshing = true;

        shared.replace(vec![Feed::new("a"), Feed::new("b")]);
        handle_app_event(&mut app, AppEvent::FeedsRefreshed { count: 2 });
        assert_eq!(app.screen.projection().len(), 2);
        assert!(!app.refreshing);
        assert_eq!(
            app.status_message.as_ref().map(|(m, _, _)| m.as_ref()),
            Some("Reloaded 2 feeds")
        );

        handle_app_event(
            &mut app,
            AppEvent::RefreshFailed {
                error: "disk on fire".to_string(),
            },
        );
        let (msg, level, _) = app.status_message.clone().unwrap();
        assert_eq!(msg, "Error: reload failed: disk on fire");
        assert_eq!(level, NoticeLevel::Error);
    }
}
