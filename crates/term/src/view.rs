//! GameView: maps a [`GameSnapshot`] into a framebuffer.
//!
//! Pure (no I/O). The floor map is drawn from above with "forward" for the
//! current heading pointing up the screen, so screen directions always agree
//! with the movement keys.

use crate::core::GameSnapshot;
use crate::fb::{Cell, FrameBuffer, Rgb, Style};
use crate::types::{BlockKind, Heading, BACKWARD, RIGHT};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const KIND_COLORS: [Rgb; 7] = [
    Rgb::new(0, 220, 220),
    Rgb::new(240, 150, 0),
    Rgb::new(170, 80, 220),
    Rgb::new(240, 220, 0),
    Rgb::new(60, 110, 240),
    Rgb::new(230, 60, 60),
    Rgb::new(70, 210, 90),
];

const FRAME: Style = Style::fg(Rgb::new(110, 110, 130));
const LABEL: Style = Style::fg(Rgb::new(150, 150, 150));
const ALERT: Style = Style::fg(Rgb::new(255, 80, 80)).bold();
const GAUGE_WIDTH: usize = 10;
const HELP: &str = "WASD move  O/P K/L M/, rotate  Space drop  C hold  \u{2190}/\u{2192} orbit  Esc pause  Q quit";

fn kind_color(kind: BlockKind) -> Rgb {
    KIND_COLORS[(kind.id() - 1) as usize]
}

/// Screen position (column, row) of floor column `(x, z)` in a map of a grid
/// with `dimensions`, seen from `heading`.
pub fn project(dimensions: [usize; 3], heading: Heading, x: i32, z: i32) -> (u16, u16) {
    let [sx, _, sz] = dimensions;
    let (last_x, last_z) = (sx as i32 - 1, sz as i32 - 1);
    let right = RIGHT[heading.index()];
    let back = BACKWARD[heading.index()];

    let axis = |dx: i32, dz: i32| {
        let origin = (last_x * dx).min(0) + (last_z * dz).min(0);
        (x * dx + z * dz - origin).max(0) as u16
    };
    (axis(right.x, right.z), axis(back.x, back.z))
}

/// Map size in floor cells (columns, rows) for a heading.
fn map_size(dimensions: [usize; 3], heading: Heading) -> (u16, u16) {
    let [sx, _, sz] = dimensions;
    match heading {
        Heading::Deg0 | Heading::Deg180 => (sx as u16, sz as u16),
        Heading::Deg90 | Heading::Deg270 => (sz as u16, sx as u16),
    }
}

/// A lightweight terminal renderer for the 3D game.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Floor cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2 columns per cell keeps floor cells roughly square.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        heading: Heading,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        if fb.width() != viewport.width || fb.height() != viewport.height {
            fb.resize(viewport.width, viewport.height);
        } else {
            fb.clear();
        }

        fb.put_str(1, 0, "TETRIS 3D", Style::PLAIN.bold());

        let (cols, rows) = map_size(snap.dimensions, heading);
        let frame_w = cols * self.cell_w + 2;
        let frame_h = rows + 2;
        fb.draw_frame(0, 1, frame_w, frame_h, FRAME);
        self.draw_floor(snap, heading, fb);

        if snap.game_over {
            self.banner(fb, frame_w, frame_h, "GAME OVER");
        } else if snap.paused {
            self.banner(fb, frame_w, frame_h, "PAUSED");
        }

        let hud_x = frame_w + 2;
        let after_hud = draw_hud(snap, heading, hud_x, 1, fb);
        draw_gauges(snap, hud_x, after_hud + 1, fb);

        if viewport.height > 0 {
            fb.put_str(0, viewport.height - 1, HELP, LABEL);
        }
    }

    pub fn render(&self, snap: &GameSnapshot, heading: Heading, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, heading, viewport, &mut fb);
        fb
    }

    fn put_floor_cell(&self, fb: &mut FrameBuffer, col: u16, row: u16, glyph: [char; 2], style: Style) {
        let x = 1 + col * self.cell_w;
        let y = 2 + row;
        for dx in 0..self.cell_w {
            let ch = glyph[(dx as usize).min(1)];
            fb.set(x + dx, y, Cell { ch, style });
        }
    }

    fn draw_floor(&self, snap: &GameSnapshot, heading: Heading, fb: &mut FrameBuffer) {
        let [sx, sy, sz] = snap.dimensions;

        // Topmost occupied cell per column.
        let mut tops: Vec<Option<(i32, BlockKind)>> = vec![None; sx * sz];
        for cell in &snap.occupied {
            let idx = cell.pos.x as usize * sz + cell.pos.z as usize;
            if let Some(slot) = tops.get_mut(idx) {
                if slot.map_or(true, |(y, _)| cell.pos.y < y) {
                    *slot = Some((cell.pos.y, cell.kind));
                }
            }
        }

        for x in 0..sx as i32 {
            for z in 0..sz as i32 {
                let (col, row) = project(snap.dimensions, heading, x, z);
                match tops[x as usize * sz + z as usize] {
                    Some((top, kind)) => {
                        let height = sy as i32 - top;
                        let digits = format!("{height:>2}");
                        let mut chars = digits.chars().rev();
                        let lo = chars.next().unwrap_or('?');
                        let hi = chars.next().unwrap_or(' ');
                        self.put_floor_cell(fb, col, row, [hi, lo], Style::fg(kind_color(kind)));
                    }
                    None => self.put_floor_cell(fb, col, row, [' ', '\u{b7}'], FRAME),
                }
            }
        }

        if let Some(shadow) = &snap.shadow {
            let style = Style::fg(kind_color(shadow.kind).darken(1, 2));
            for pos in &shadow.cells {
                let (col, row) = project(snap.dimensions, heading, pos.x, pos.z);
                self.put_floor_cell(fb, col, row, [':', ':'], style);
            }
        }
        if let Some(current) = &snap.current {
            let style = Style::fg(kind_color(current.kind)).bold();
            for pos in &current.cells {
                let (col, row) = project(snap.dimensions, heading, pos.x, pos.z);
                self.put_floor_cell(fb, col, row, ['[', ']'], style);
            }
        }
    }

    fn banner(&self, fb: &mut FrameBuffer, frame_w: u16, frame_h: u16, text: &str) {
        let len = text.chars().count() as u16;
        let x = frame_w.saturating_sub(len) / 2;
        let y = 1 + frame_h / 2;
        fb.put_str(x, y, text, ALERT);
    }
}

fn kind_label(kind: Option<BlockKind>) -> String {
    kind.map_or_else(|| "-".to_string(), |k| k.as_str().to_uppercase())
}

/// Returns the first row below the HUD.
fn draw_hud(snap: &GameSnapshot, heading: Heading, x: u16, y: u16, fb: &mut FrameBuffer) -> u16 {
    let hold = if snap.can_hold {
        kind_label(snap.held)
    } else {
        format!("{} (used)", kind_label(snap.held))
    };
    let lines = [
        ("SCORE", snap.total_score.to_string()),
        ("COMBO", format!("x{}", snap.combo_index)),
        ("FALL", format!("{}ms", snap.down_interval_ms)),
        ("NEXT", kind_label(snap.next)),
        ("HOLD", hold),
        ("VIEW", format!("{}\u{b0}", heading.index() * 90)),
    ];

    for (i, (label, value)) in lines.iter().enumerate() {
        let row = y + i as u16;
        fb.put_str(x, row, label, LABEL);
        fb.put_str(x + 7, row, value, Style::PLAIN.bold());
    }
    y + lines.len() as u16
}

fn draw_gauges(snap: &GameSnapshot, x: u16, y: u16, fb: &mut FrameBuffer) {
    let [sx, sy, sz] = snap.dimensions;
    let area = (sx * sz).max(1);

    let mut fill = vec![0usize; sy];
    for cell in &snap.occupied {
        if let Some(count) = fill.get_mut(cell.pos.y as usize) {
            *count += 1;
        }
    }
    let live: Vec<i32> = snap
        .current
        .iter()
        .flat_map(|b| b.cells.iter().map(|c| c.y))
        .collect();

    for (plane, &count) in fill.iter().enumerate() {
        let mut filled = count * GAUGE_WIDTH / area;
        if count > 0 {
            filled = filled.max(1);
        }
        let bar: String = (0..GAUGE_WIDTH)
            .map(|i| if i < filled { '\u{2588}' } else { '\u{2591}' })
            .collect();
        let row = y + plane as u16;
        let style = if count == area { ALERT } else { FRAME };
        fb.put_str(x, row, &format!("{plane:>2}"), LABEL);
        let end = fb.put_str(x + 3, row, &bar, style);
        if live.contains(&(plane as i32)) {
            fb.put_str(end, row, "\u{25c2}", Style::PLAIN.bold());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn heading_zero_puts_forward_at_top() {
        let dims = [4, 6, 3];
        assert_eq!(project(dims, Heading::Deg0, 0, 0), (0, 2));
        assert_eq!(project(dims, Heading::Deg0, 3, 2), (3, 0));
    }

    #[test]
    fn projection_is_a_bijection_at_every_heading() {
        let dims = [5, 6, 3];
        for heading in Heading::ALL {
            let (cols, rows) = map_size(dims, heading);
            let mut seen = HashSet::new();
            for x in 0..5 {
                for z in 0..3 {
                    let (c, r) = project(dims, heading, x, z);
                    assert!(c < cols && r < rows, "{heading:?} ({x},{z}) -> ({c},{r})");
                    assert!(seen.insert((c, r)));
                }
            }
        }
    }

    #[test]
    fn right_key_moves_right_on_screen() {
        let dims = [6, 6, 6];
        for heading in Heading::ALL {
            let step = RIGHT[heading.index()];
            let (c0, r0) = project(dims, heading, 2, 2);
            let (c1, r1) = project(dims, heading, 2 + step.x, 2 + step.z);
            assert_eq!((c1, r1), (c0 + 1, r0), "{heading:?}");
        }
    }
}
