//! 2D canvas painter for built frames (WASM only)

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::frame::{Frame, Hud, RenderSink, Sprite, SpriteKind};
use super::scoped;
use crate::error::SinkError;
use crate::sim::{GamePhase, OptionSide};

/// Base sprite sizes at scale 1 (pixels)
const RUNNER_SIZE: f64 = 56.0;
const COIN_RADIUS: f64 = 16.0;
const HAZARD_SIZE: f64 = 64.0;
const GATE_WIDTH: f64 = 120.0;
const GATE_HEIGHT: f64 = 90.0;
const FINISH_WIDTH: f64 = 440.0;
const FINISH_HEIGHT: f64 = 24.0;

/// Vertical position of the runner's ground line, as a fraction of height
const GROUND_LINE: f64 = 0.82;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    show_hud: bool,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, SinkError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| SinkError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| SinkError::Unavailable("no 2d context".to_string()))?;
        let ctx: CanvasRenderingContext2d = wasm_bindgen::JsCast::dyn_into(ctx)
            .map_err(|_| SinkError::Unavailable("not a 2d context".to_string()))?;
        Ok(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            show_hud: true,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f64;
        self.height = height as f64;
    }

    pub fn set_show_hud(&mut self, show: bool) {
        self.show_hud = show;
    }

    fn origin(&self) -> (f64, f64) {
        (self.width * 0.5, self.height * GROUND_LINE)
    }

    /// Paint one sprite inside its own save/restore pair
    fn draw_sprite(&self, sprite: &Sprite) -> Result<(), SinkError> {
        scoped(
            || self.ctx.save(),
            || self.paint_sprite(sprite),
            || self.ctx.restore(),
        )
    }

    fn paint_sprite(&self, sprite: &Sprite) -> Result<(), SinkError> {
        let ctx = &self.ctx;
        let (ox, oy) = self.origin();
        let s = sprite.scale as f64;

        ctx.set_global_alpha(sprite.opacity.clamp(0.0, 1.0) as f64);
        ctx.translate(ox + sprite.screen.x as f64, oy + sprite.screen.y as f64)
            .map_err(js_err)?;
        ctx.rotate((sprite.rotation_deg as f64).to_radians())
            .map_err(js_err)?;

        match sprite.kind {
            SpriteKind::Runner { airborne } => {
                let size = RUNNER_SIZE * s;
                ctx.set_fill_style_str(if airborne { "#7fd3ff" } else { "#3fa9f5" });
                ctx.fill_rect(-size * 0.5, -size, size, size);
            }
            SpriteKind::Coin => {
                ctx.set_fill_style_str("#ffd23f");
                ctx.begin_path();
                ctx.arc(0.0, -COIN_RADIUS * s, COIN_RADIUS * s, 0.0, TAU)
                    .map_err(js_err)?;
                ctx.fill();
            }
            SpriteKind::Hazard => {
                let size = HAZARD_SIZE * s;
                ctx.set_fill_style_str("#e63946");
                ctx.fill_rect(-size * 0.5, -size, size, size);
            }
            SpriteKind::GateOption { side, .. } => {
                let (w, h) = (GATE_WIDTH * s, GATE_HEIGHT * s);
                ctx.set_fill_style_str(match side {
                    OptionSide::Left => "rgba(131, 56, 236, 0.6)",
                    OptionSide::Right => "rgba(6, 214, 160, 0.6)",
                });
                ctx.fill_rect(-w * 0.5, -h, w, h);
            }
            SpriteKind::FinishLine => {
                let (w, h) = (FINISH_WIDTH * s, FINISH_HEIGHT * s);
                ctx.set_fill_style_str("#ffffff");
                ctx.fill_rect(-w * 0.5, -h, w, h);
            }
        }

        Ok(())
    }

    fn draw_hud(&self, hud: &Hud) -> Result<(), SinkError> {
        let ctx = &self.ctx;
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("20px sans-serif");
        ctx.fill_text(&format!("Score {}", hud.score), 16.0, 32.0)
            .map_err(js_err)?;
        ctx.fill_text(&format!("Level {}", hud.level), 16.0, 58.0)
            .map_err(js_err)?;

        if let Some(question) = &hud.question {
            ctx.set_font("24px sans-serif");
            ctx.fill_text(question, 16.0, 96.0).map_err(js_err)?;
            if let Some((left, right)) = &hud.answers {
                ctx.set_font("18px sans-serif");
                ctx.fill_text(&format!("\u{2190} {}", left), 16.0, 124.0)
                    .map_err(js_err)?;
                ctx.fill_text(&format!("{} \u{2192}", right), 16.0, 148.0)
                    .map_err(js_err)?;
            }
        }

        match hud.phase {
            GamePhase::Paused => {
                ctx.set_font("36px sans-serif");
                ctx.fill_text("Paused", self.width * 0.5 - 60.0, self.height * 0.4)
                    .map_err(js_err)?;
            }
            GamePhase::Completed => {
                ctx.set_font("36px sans-serif");
                ctx.fill_text("Finished! Press R", self.width * 0.5 - 150.0, self.height * 0.4)
                    .map_err(js_err)?;
            }
            GamePhase::Running => {}
        }
        Ok(())
    }
}

fn js_err(e: wasm_bindgen::JsValue) -> SinkError {
    SinkError::Other(format!("{:?}", e))
}

impl RenderSink for CanvasRenderer {
    fn draw(&mut self, frame: &Frame) -> Result<(), SinkError> {
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str("#1d1b2f");
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);

        for sprite in &frame.sprites {
            self.draw_sprite(sprite)?;
        }
        if self.show_hud {
            self.draw_hud(&frame.hud)?;
        }
        Ok(())
    }
}
