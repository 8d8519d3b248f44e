use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, SendError, Sender};

use bevy::prelude::*;

use crate::region::RegionModel;

/// A freshly delivered region snapshot. Writing this event is the single
/// entry point into the scene pipeline; the synchronizer, HUD and camera
/// each react to it on the next frame.
#[derive(Event, Debug, Clone)]
pub struct RegionSnapshot(pub RegionModel);

/// Producer half of the subscription bridge, for pushing snapshots from
/// outside the bevy schedule (fetch threads, test harnesses)
#[derive(Clone)]
pub struct RegionFeed {
    sender: Sender<RegionModel>,
}

impl RegionFeed {
    pub fn push(&self, region: RegionModel) -> Result<(), SendError<RegionModel>> {
        self.sender.send(region)
    }
}

/// Consumer half, drained once per frame by the pump system
#[derive(Resource)]
pub struct RegionInbox {
    receiver: Mutex<Receiver<RegionModel>>,
}

/// Create a subscription bridge. Insert the inbox as a resource and hand
/// the feed to whatever produces snapshots.
pub fn region_channel() -> (RegionFeed, RegionInbox) {
    let (sender, receiver) = mpsc::channel();
    (
        RegionFeed { sender },
        RegionInbox {
            receiver: Mutex::new(receiver),
        },
    )
}

pub struct RegionSubscriptionPlugin;

impl Plugin for RegionSubscriptionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RegionSnapshot>()
            .add_systems(PreUpdate, pump_region_inbox);
    }
}

/// Forward the newest inbox snapshot into the event stream. Snapshots are
/// at-most-one-in-flight: anything older than the newest is dropped, the
/// scene would be rebuilt over it on the same frame anyway.
fn pump_region_inbox(
    inbox: Option<Res<RegionInbox>>,
    mut snapshots: EventWriter<RegionSnapshot>,
) {
    let Some(inbox) = inbox else {
        return;
    };
    let Ok(receiver) = inbox.receiver.lock() else {
        return;
    };

    let mut latest = None;
    let mut stale = 0;
    while let Ok(region) = receiver.try_recv() {
        if latest.is_some() {
            stale += 1;
        }
        latest = Some(region);
    }

    if stale > 0 {
        debug!("dropped {stale} stale region snapshot(s)");
    }
    if let Some(region) = latest {
        snapshots.write(RegionSnapshot(region));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pump_app() -> (App, RegionFeed) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_event::<RegionSnapshot>();
        app.add_systems(PreUpdate, pump_region_inbox);
        let (feed, inbox) = region_channel();
        app.insert_resource(inbox);
        (app, feed)
    }

    fn delivered_names(app: &App) -> Vec<String> {
        let events = app.world().resource::<Events<RegionSnapshot>>();
        events
            .get_cursor()
            .read(events)
            .map(|snapshot| snapshot.0.name.clone())
            .collect()
    }

    #[test]
    fn test_pump_forwards_pushed_region() {
        let (mut app, feed) = pump_app();
        feed.push(RegionModel::new("riverside", vec![])).unwrap();
        app.update();
        assert_eq!(delivered_names(&app), vec!["riverside"]);
    }

    #[test]
    fn test_pump_keeps_only_newest_snapshot() {
        let (mut app, feed) = pump_app();
        feed.push(RegionModel::new("stale", vec![])).unwrap();
        feed.push(RegionModel::new("fresh", vec![])).unwrap();
        app.update();
        assert_eq!(delivered_names(&app), vec!["fresh"]);
    }

    #[test]
    fn test_pump_without_inbox_is_a_no_op() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_event::<RegionSnapshot>();
        app.add_systems(PreUpdate, pump_region_inbox);
        app.update();
        assert!(delivered_names(&app).is_empty());
    }
}
