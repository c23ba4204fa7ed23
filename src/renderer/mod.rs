//! Rendering module
//!
//! The simulation never draws. `frame` turns state into projected sprites;
//! on the web, `canvas` paints them with the 2D canvas API.

pub mod frame;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use frame::{Frame, Hud, RenderSink, Sprite, SpriteKind, build_frame};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

/// Run `body` between `enter` and `exit`; `exit` runs even when `body` fails
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn scoped<T, E>(
    enter: impl FnOnce(),
    body: impl FnOnce() -> Result<T, E>,
    exit: impl FnOnce(),
) -> Result<T, E> {
    enter();
    let result = body();
    exit();
    result
}
