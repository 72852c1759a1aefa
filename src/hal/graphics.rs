//! Watch-face renderer for any monochrome `embedded-graphics` target.
//!
//! Draws the 144x168 face:
//!
//! ```text
//! ┌──────────────────────────┐
//! │▪ -45                   ● │  status strip (failure square, offset, battery)
//! │        Wednesday         │
//! │       3 September        │  date
//! │          08:30           │  clock
//! │                          │
//! │ 5 min     12 min  canc.  │
//! │ 08:35     08:42   08:50  │  departures
//! │ LST to CBG (4)           │
//! └──────────────────────────┘
//! ```
//!
//! The background is inverted while the phone is disconnected.

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_4X6, FONT_6X10},
        MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::format::{BatteryAlert, Frame, Indicators};
use crate::traits::Renderer;

/// Face width in pixels.
pub const FACE_WIDTH: u32 = 144;
/// Face height in pixels.
pub const FACE_HEIGHT: u32 = 168;

const DATE_ORIGIN: Point = Point::new(72, 14);
const CLOCK_ORIGIN: Point = Point::new(72, 58);
const TRAIN_COLUMNS: [Point; 3] = [
    Point::new(5, 105),
    Point::new(59, 105),
    Point::new(102, 105),
];
const OFFSET_ORIGIN: Point = Point::new(12, 2);
const BATTERY_CENTER: Point = Point::new(138, 6);
const BATTERY_DIAMETER: u32 = 7;
const FAILURE_SQUARE: Rectangle = Rectangle::new(Point::new(3, 3), Size::new(6, 6));

/// Renderer drawing onto a `DrawTarget<Color = BinaryColor>`.
///
/// Every call redraws the whole face from the last frame and indicators it
/// was given.
pub struct CanvasRenderer<D> {
    target: D,
    frame: Frame,
    indicators: Indicators,
    connected: bool,
}

impl<D> CanvasRenderer<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    /// Wrap a draw target
    pub fn new(target: D) -> Self {
        Self {
            target,
            frame: Frame::default(),
            indicators: Indicators::default(),
            connected: true,
        }
    }

    /// Borrow the draw target
    pub fn target(&self) -> &D {
        &self.target
    }

    /// Consume the renderer, returning the draw target
    pub fn into_inner(self) -> D {
        self.target
    }

    fn draw(&mut self) -> Result<(), D::Error> {
        let (fg, bg) = if self.connected {
            (BinaryColor::On, BinaryColor::Off)
        } else {
            (BinaryColor::Off, BinaryColor::On)
        };
        self.target.clear(bg)?;

        let centered = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Top)
            .build();
        let left = TextStyleBuilder::new()
            .alignment(Alignment::Left)
            .baseline(Baseline::Top)
            .build();
        let large = MonoTextStyle::new(&FONT_10X20, fg);
        let small = MonoTextStyle::new(&FONT_6X10, fg);

        Text::with_text_style(self.frame.date.as_str(), DATE_ORIGIN, large, centered)
            .draw(&mut self.target)?;
        Text::with_text_style(self.frame.clock.as_str(), CLOCK_ORIGIN, large, centered)
            .draw(&mut self.target)?;

        for (i, origin) in TRAIN_COLUMNS.iter().enumerate() {
            let text = self.frame.train_text(i);
            if !text.is_empty() {
                Text::with_text_style(text, *origin, small, left).draw(&mut self.target)?;
            }
        }

        self.draw_indicators(fg, left)
    }

    fn draw_indicators(
        &mut self,
        fg: BinaryColor,
        text_style: embedded_graphics::text::TextStyle,
    ) -> Result<(), D::Error> {
        if self.indicators.request_failed {
            FAILURE_SQUARE
                .into_styled(PrimitiveStyle::with_fill(fg))
                .draw(&mut self.target)?;
        }

        if !self.indicators.clock_offset.is_empty() {
            let tiny = MonoTextStyle::new(&FONT_4X6, fg);
            Text::with_text_style(
                self.indicators.clock_offset.as_str(),
                OFFSET_ORIGIN,
                tiny,
                text_style,
            )
            .draw(&mut self.target)?;
        }

        // Both severities share the filled marker; only colour targets can tell them apart
        if self.indicators.battery != BatteryAlert::None {
            Circle::with_center(BATTERY_CENTER, BATTERY_DIAMETER)
                .into_styled(PrimitiveStyle::with_fill(fg))
                .draw(&mut self.target)?;
        }
        Ok(())
    }
}

impl<D> Renderer for CanvasRenderer<D>
where
    D: DrawTarget<Color = BinaryColor>,
    D::Error: core::fmt::Debug,
{
    type Error = D::Error;

    fn render(&mut self, frame: &Frame) -> Result<(), D::Error> {
        self.frame = frame.clone();
        self.draw()
    }

    fn render_indicators(&mut self, indicators: &Indicators) -> Result<(), D::Error> {
        self.indicators = indicators.clone();
        self.draw()
    }

    fn set_connected(&mut self, connected: bool) -> Result<(), D::Error> {
        self.connected = connected;
        self.draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::truncated;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::convert::Infallible;
    use embedded_graphics::primitives::PointsIter;

    struct Canvas {
        pixels: Vec<bool>,
    }

    impl Canvas {
        fn new() -> Self {
            Self {
                pixels: vec![false; (FACE_WIDTH * FACE_HEIGHT) as usize],
            }
        }

        fn at(&self, x: i32, y: i32) -> bool {
            self.pixels[(y as u32 * FACE_WIDTH + x as u32) as usize]
        }

        fn lit_in(&self, area: Rectangle) -> usize {
            area.points().filter(|p| self.at(p.x, p.y)).count()
        }
    }

    impl OriginDimensions for Canvas {
        fn size(&self) -> Size {
            Size::new(FACE_WIDTH, FACE_HEIGHT)
        }
    }

    impl DrawTarget for Canvas {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
        where
            I: IntoIterator<Item = Pixel<BinaryColor>>,
        {
            for Pixel(p, color) in pixels {
                if p.x >= 0 && p.y >= 0 && (p.x as u32) < FACE_WIDTH && (p.y as u32) < FACE_HEIGHT {
                    self.pixels[(p.y as u32 * FACE_WIDTH + p.x as u32) as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    #[test]
    fn draws_text_regions() {
        let mut renderer = CanvasRenderer::new(Canvas::new());
        renderer
            .render(&Frame {
                clock: truncated("08:30"),
                date: truncated("Wednesday\n3 September"),
                next_train: truncated("5 min\n08:35\nLST to CBG (4)"),
                ..Default::default()
            })
            .unwrap();

        let canvas = renderer.target();
        assert!(
            canvas.lit_in(Rectangle::new(Point::new(0, 58), Size::new(144, 20))) > 0
        );
        assert!(
            canvas.lit_in(Rectangle::new(Point::new(5, 105), Size::new(54, 30))) > 0
        );
        // Later columns were empty
        assert_eq!(
            canvas.lit_in(Rectangle::new(Point::new(102, 105), Size::new(42, 20))),
            0
        );
    }

    #[test]
    fn draws_indicators() {
        let mut renderer = CanvasRenderer::new(Canvas::new());
        renderer.render(&Frame::default()).unwrap();
        assert!(!renderer.target().at(4, 4));
        assert!(!renderer.target().at(138, 6));

        renderer
            .render_indicators(&Indicators {
                battery: BatteryAlert::Critical,
                request_failed: true,
                clock_offset: truncated("-45"),
            })
            .unwrap();
        assert!(renderer.target().at(4, 4));
        assert!(renderer.target().at(138, 6));
        assert!(
            renderer.target().lit_in(Rectangle::new(OFFSET_ORIGIN, Size::new(12, 6))) > 0
        );
    }

    #[test]
    fn low_battery_marker_is_filled() {
        let mut renderer = CanvasRenderer::new(Canvas::new());
        renderer.render(&Frame::default()).unwrap();
        renderer
            .render_indicators(&Indicators {
                battery: BatteryAlert::Low,
                ..Default::default()
            })
            .unwrap();
        assert!(renderer.target().at(138, 6));
        assert!(renderer.target().at(137, 6));
    }

    #[test]
    fn disconnect_inverts_background() {
        let mut renderer = CanvasRenderer::new(Canvas::new());
        renderer.render(&Frame::default()).unwrap();
        assert!(!renderer.target().at(0, 167));

        renderer.set_connected(false).unwrap();
        assert!(renderer.target().at(0, 167));

        renderer.set_connected(true).unwrap();
        assert!(!renderer.target().at(0, 167));
    }
}
