use super::model::{FaceGeometry, NumberEntry, Point, SelectorState};
use super::{CENTER_DOT_SIZE, HAND_WIDTH, LABEL_FONT_SIZE, SELECTOR_DOT_SIZE, SELECTOR_SIZE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use palette::Srgba;
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn fill_circle(cr: &Context, center: Point, radius: f64) -> Result<(), cairo::Error> {
    cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
    cr.fill()
}

struct LabelRenderer<'a> {
    numbers: &'a [NumberEntry],
}

impl<'a> LabelRenderer<'a> {
    fn new(numbers: &'a [NumberEntry]) -> Self {
        Self { numbers }
    }

    fn draw(&self, cr: &Context, color: Srgba<f64>) -> Result<(), cairo::Error> {
        set_color(cr, color);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        cr.set_font_size(LABEL_FONT_SIZE);

        for number in self.numbers.iter().filter(|n| n.display) {
            let ext = cr.text_extents(&number.label)?;
            // centre the ink box on the entry position
            cr.move_to(
                number.position.x - ext.width() / 2.0 - ext.x_bearing(),
                number.position.y - ext.height() / 2.0 - ext.y_bearing(),
            );
            cr.show_text(&number.label)?;
        }
        Ok(())
    }
}

struct HandRenderer<'a> {
    geometry: &'a FaceGeometry,
    tip: Point,
    on_label: bool,
}

impl HandRenderer<'_> {
    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let center = Point::new(self.geometry.radius, self.geometry.radius);

        set_color(cr, colors.hand);
        cr.set_line_width(HAND_WIDTH);
        cr.move_to(center.x, center.y);
        cr.line_to(self.tip.x, self.tip.y);
        cr.stroke()?;

        fill_circle(cr, center, CENTER_DOT_SIZE)?;
        fill_circle(cr, self.tip, SELECTOR_SIZE)?;

        if !self.on_label {
            set_color(cr, colors.label_on_hand);
            fill_circle(cr, self.tip, SELECTOR_DOT_SIZE)?;
        }
        Ok(())
    }
}

pub fn draw(cr: &Context, state: &SelectorState, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let Some(geometry) = state.geometry else {
        return Ok(());
    };

    cr.save()?;
    cr.translate(geometry.origin.x, geometry.origin.y);

    set_color(cr, colors.face);
    fill_circle(
        cr,
        Point::new(geometry.radius, geometry.radius),
        geometry.radius,
    )?;

    let labels = LabelRenderer::new(&state.numbers);
    labels.draw(cr, colors.label)?;

    if let Some(tip) = state.hand {
        HandRenderer {
            geometry: &geometry,
            tip,
            on_label: state.hand_on_label,
        }
        .draw(cr, colors)?;

        // redraw labels inside the selector disc so they show through the hand
        cr.save()?;
        cr.arc(tip.x, tip.y, SELECTOR_SIZE, 0.0, 2.0 * PI);
        cr.clip();
        labels.draw(cr, colors.label_on_hand)?;
        cr.restore()?;
    }

    cr.restore()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClockPreset;
    use cairo::{Format, ImageSurface};

    fn pixel(surface: &mut ImageSurface, x: usize, y: usize) -> [u8; 4] {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let offset = y * stride + x * 4;
        [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]
    }

    #[test]
    fn test_unmeasured_face_draws_nothing() {
        let mut surface = ImageSurface::create(Format::ARgb32, 50, 50).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            let state = SelectorState::new(ClockPreset::Hours.clock(), 3);
            draw(&cr, &state, &ThemeColors::default()).unwrap();
        }
        assert_eq!(pixel(&mut surface, 25, 25), [0, 0, 0, 0]);
    }

    #[test]
    fn test_hand_is_painted_at_selected_position() {
        let mut surface = ImageSurface::create(Format::ARgb32, 200, 200).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            let mut state = SelectorState::new(ClockPreset::Hours.clock(), 0);
            state.measure(200.0, 200.0);
            state.apply_rotation(90.0, false);
            draw(&cr, &state, &ThemeColors::default()).unwrap();
        }

        // ARGB32 is stored as BGRA on little endian; just compare against the face
        let face = pixel(&mut surface, 100, 60);
        let selector_edge = pixel(&mut surface, 176, 100 + 15);
        assert_eq!(face[3], 255);
        assert_ne!(face, selector_edge);
        // outside the face stays transparent
        assert_eq!(pixel(&mut surface, 1, 1), [0, 0, 0, 0]);
    }
}
