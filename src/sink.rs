use serde::{Deserialize, Serialize};

/// Which sprite the host should show. Asset lookup is the host's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Sitting,
    WalkingRight,
    WalkingLeft,
}

impl SpriteKind {
    pub fn walking(facing_right: bool) -> Self {
        if facing_right {
            SpriteKind::WalkingRight
        } else {
            SpriteKind::WalkingLeft
        }
    }
}

/// Receiver of the controller's outward commands.
pub trait RenderSink {
    fn set_sprite(&mut self, sprite: SpriteKind);
    fn set_position(&mut self, x: f64);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SinkCommand {
    Sprite(SpriteKind),
    Position(f64),
}

/// Recording sink.
impl RenderSink for Vec<SinkCommand> {
    fn set_sprite(&mut self, sprite: SpriteKind) {
        self.push(SinkCommand::Sprite(sprite));
    }

    fn set_position(&mut self, x: f64) {
        self.push(SinkCommand::Position(x));
    }
}

/// Sprite changes only, in order.
pub fn sprites(commands: &[SinkCommand]) -> Vec<SpriteKind> {
    commands
        .iter()
        .filter_map(|c| match c {
            SinkCommand::Sprite(s) => Some(*s),
            SinkCommand::Position(_) => None,
        })
        .collect()
}
