//! Player button groups with timed relaxation back to the embed control.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use crate::{video::VideoDescriptor, view::PreviewView};

/// How long an external-link or timestamp action stays active.
pub const RELAX_DELAY: Duration = Duration::from_millis(1000);

pub trait Control: Copy + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Transient controls relax back to the default after the group delay.
    fn is_transient(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerControl {
    #[default]
    Embed,
    ExternalLink,
    JumpToTimestamp,
}

impl Control for PlayerControl {
    fn is_transient(&self) -> bool {
        !matches!(self, PlayerControl::Embed)
    }
}

impl PlayerControl {
    /// URL the caller should load (embed) or open (the other two).
    pub fn target_url<'a>(&self, video: &'a VideoDescriptor) -> &'a str {
        match self {
            PlayerControl::Embed => video.embed_url(),
            PlayerControl::ExternalLink => video.clean_url(),
            PlayerControl::JumpToTimestamp => video.timestamp_url(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewControl {
    #[default]
    Embed,
    ExternalLink,
}

impl Control for PreviewControl {
    fn is_transient(&self) -> bool {
        matches!(self, PreviewControl::ExternalLink)
    }
}

impl PreviewControl {
    pub fn target_url<'a>(&self, preview: &'a PreviewView) -> &'a str {
        match self {
            PreviewControl::Embed => &preview.embed_url,
            PreviewControl::ExternalLink => &preview.clean_url,
        }
    }
}

/// One mutually exclusive button group.
///
/// At most one relaxation task is pending per group; every explicit
/// selection cancels it before publishing the new control.
pub struct ControlGroup<C: Control> {
    name: &'static str,
    active: Arc<watch::Sender<C>>,
    epoch: Arc<AtomicU64>,
    relax_delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl<C: Control> ControlGroup<C> {
    pub fn new(name: &'static str, relax_delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(C::default());
        Self {
            name,
            active: Arc::new(tx),
            epoch: Arc::new(AtomicU64::new(0)),
            relax_delay,
            pending: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn active(&self) -> C {
        *self.active.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<C> {
        self.active.subscribe()
    }

    pub fn has_pending_relax(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Must be called from within a tokio runtime when `control` is transient.
    pub fn select(&mut self, control: C) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }

        // The epoch bump happens under the channel lock so a relaxation
        // task that already woke up cannot overwrite this selection.
        let epoch = Arc::clone(&self.epoch);
        let mut my_epoch = 0;
        self.active.send_modify(|active| {
            my_epoch = epoch.fetch_add(1, Ordering::SeqCst) + 1;
            *active = control;
        });
        debug!(group = self.name, ?control, "control selected");

        if !control.is_transient() {
            return;
        }

        let active = Arc::clone(&self.active);
        let name = self.name;
        let delay = self.relax_delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let relaxed = active.send_if_modified(|current| {
                if epoch.load(Ordering::SeqCst) != my_epoch {
                    return false;
                }
                *current = C::default();
                true
            });
            if relaxed {
                debug!(group = name, "control relaxed to default");
            }
        }));
    }
}

impl<C: Control> Drop for ControlGroup<C> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

/// Main player and preview player groups. They never affect each other.
pub struct PlayerControls {
    main: ControlGroup<PlayerControl>,
    preview: ControlGroup<PreviewControl>,
}

impl PlayerControls {
    pub fn new(relax_delay: Duration) -> Self {
        Self {
            main: ControlGroup::new("main", relax_delay),
            preview: ControlGroup::new("preview", relax_delay),
        }
    }

    pub fn main(&self) -> &ControlGroup<PlayerControl> {
        &self.main
    }

    pub fn preview(&self) -> &ControlGroup<PreviewControl> {
        &self.preview
    }

    /// Select a main player control and return the URL to load or open.
    pub fn select_main<'a>(&mut self, control: PlayerControl, video: &'a VideoDescriptor) -> &'a str {
        self.main.select(control);
        control.target_url(video)
    }

    pub fn select_preview<'a>(&mut self, control: PreviewControl, preview: &'a PreviewView) -> &'a str {
        self.preview.select(control);
        control.target_url(preview)
    }
}

impl Default for PlayerControls {
    fn default() -> Self {
        Self::new(RELAX_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;
    use crate::view::compute_preview_view;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn external_link_relaxes_after_delay() {
        let mut group = ControlGroup::<PlayerControl>::new("main", RELAX_DELAY);
        group.select(PlayerControl::ExternalLink);
        assert_eq!(group.active(), PlayerControl::ExternalLink);

        sleep(ms(999)).await;
        assert_eq!(group.active(), PlayerControl::ExternalLink);

        sleep(ms(2)).await;
        assert_eq!(group.active(), PlayerControl::Embed);
        assert!(!group.has_pending_relax());
    }

    #[tokio::test(start_paused = true)]
    async fn new_selection_cancels_pending_relaxation() {
        let mut group = ControlGroup::<PlayerControl>::new("main", RELAX_DELAY);
        group.select(PlayerControl::ExternalLink);
        sleep(ms(500)).await;
        group.select(PlayerControl::JumpToTimestamp);

        // The first timer would have fired at 1000ms.
        sleep(ms(600)).await;
        assert_eq!(group.active(), PlayerControl::JumpToTimestamp);

        sleep(ms(500)).await;
        assert_eq!(group.active(), PlayerControl::Embed);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_embed_is_not_transient() {
        let mut group = ControlGroup::<PlayerControl>::new("main", RELAX_DELAY);
        group.select(PlayerControl::ExternalLink);
        group.select(PlayerControl::Embed);
        assert!(!group.has_pending_relax());
        sleep(ms(1500)).await;
        assert_eq!(group.active(), PlayerControl::Embed);
    }

    #[tokio::test(start_paused = true)]
    async fn groups_are_independent() {
        let video = VideoDescriptor::new("https://youtu.be/abc", 30, 90);
        let preview = compute_preview_view("https://youtu.be/abc").unwrap();
        let mut controls = PlayerControls::default();

        let url = controls.select_main(PlayerControl::JumpToTimestamp, &video);
        assert_eq!(url, "https://www.youtube.com/watch?v=abc&t=30s");
        sleep(ms(600)).await;

        let url = controls.select_preview(PreviewControl::ExternalLink, &preview);
        assert_eq!(url, "https://www.youtube.com/watch?v=abc");
        assert_eq!(controls.main().active(), PlayerControl::JumpToTimestamp);

        sleep(ms(500)).await;
        assert_eq!(controls.main().active(), PlayerControl::Embed);
        assert_eq!(controls.preview().active(), PreviewControl::ExternalLink);

        sleep(ms(600)).await;
        assert_eq!(controls.preview().active(), PreviewControl::Embed);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_relaxation() {
        let mut group = ControlGroup::<PreviewControl>::new("preview", RELAX_DELAY);
        let mut rx = group.subscribe();
        group.select(PreviewControl::ExternalLink);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), PreviewControl::ExternalLink);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), PreviewControl::Embed);
    }

    #[test]
    fn embed_targets() {
        let video = VideoDescriptor::new("https://youtu.be/abc", 5, 10);
        assert_eq!(
            PlayerControl::Embed.target_url(&video),
            "https://www.youtube.com/embed/abc?start=5&end=10&autoplay=0&rel=0"
        );
        assert_eq!(
            PlayerControl::ExternalLink.target_url(&video),
            "https://www.youtube.com/watch?v=abc"
        );
    }
}
