use trashify_core::{
    controller::{NearbyItemsController, NearbySnapshot},
    model::{Annotation, Coordinate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Nearby,
    PointDetail,
}

pub(crate) struct App {
    pub nearby: NearbyItemsController,

    pub screen: Screen,
    pub coordinate_input: String,
    pub list_index: usize,
    pub device_location: Option<Coordinate>,

    pub snapshot: NearbySnapshot,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(nearby: NearbyItemsController, device_location: Option<Coordinate>) -> Self {
        let snapshot = nearby.snapshot();
        Self {
            nearby,
            screen: Screen::Nearby,
            coordinate_input: String::new(),
            list_index: 0,
            device_location,
            snapshot,
            error_message: None,
        }
    }

    /// Pull the latest published state and keep the cursor inside the list.
    pub(crate) fn refresh(&mut self) {
        self.snapshot = self.nearby.snapshot();
        let len = self.snapshot.annotations.len();
        if self.list_index >= len {
            self.list_index = len.saturating_sub(1);
        }
        if len == 0 && self.screen == Screen::PointDetail {
            self.screen = Screen::Nearby;
        }
    }

    pub(crate) fn current_annotation(&self) -> Option<&Annotation> {
        self.snapshot.annotations.get(self.list_index)
    }

    pub(crate) fn open_current_point(&mut self) {
        if self.current_annotation().is_some() {
            self.screen = Screen::PointDetail;
        }
    }
}
