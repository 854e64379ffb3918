//! Conversion logic from domain entities to DTOs.

use tsunagi_shared::time::format_display_time;

use crate::domain::{BroadcastMessage, DirectMessage, Nudge, UserView};
use crate::infrastructure::dto::{http, websocket as ws};

impl From<BroadcastMessage> for ws::BroadcastMessageDto {
    fn from(model: BroadcastMessage) -> Self {
        Self {
            user: model.sender,
            text: model.text.into_string(),
            time: format_display_time(model.timestamp.value()),
            timestamp: model.timestamp.value(),
            system: model.system,
        }
    }
}

impl From<DirectMessage> for ws::DirectMessageDto {
    fn from(model: DirectMessage) -> Self {
        Self {
            from: model.from.into_string(),
            to: model.to.into_string(),
            text: model.text.into_string(),
            time: format_display_time(model.timestamp.value()),
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<Nudge> for ws::NudgeDto {
    fn from(model: Nudge) -> Self {
        Self {
            from: model.from.into_string(),
            time: format_display_time(model.timestamp.value()),
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<UserView> for http::UserDto {
    fn from(model: UserView) -> Self {
        Self {
            username: model.username.into_string(),
            status: model.status,
            avatar: model.avatar,
        }
    }
}
