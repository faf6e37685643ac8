use std::fmt::Write;

use stopwatch_core::{format_hms_cs, format_mm_ss_cs, LapRow, Snapshot};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const ONE_HOUR_MS: u64 = 60 * 60 * 1000;

pub fn clear_screen(out: &mut String) {
    out.push_str(CLEAR_SCREEN);
}

fn format_total(ms: u64) -> String {
    if ms >= ONE_HOUR_MS {
        format_hms_cs(ms)
    } else {
        format_mm_ss_cs(ms)
    }
}

fn lap_marker(lap: &LapRow) -> &'static str {
    match (lap.is_fastest, lap.is_slowest) {
        (true, true) => "  fastest/slowest",
        (true, false) => "  fastest",
        (false, true) => "  slowest",
        (false, false) => "",
    }
}

pub fn draw_stopwatch(out: &mut String, state: &Snapshot, scroll_offset: usize, max_visible: usize) -> std::fmt::Result {
    writeln!(out, "STOPWATCH")?;
    writeln!(out)?;
    writeln!(out, "  {}", format_total(state.total_elapsed_ms))?;
    writeln!(out)?;

    // Lap list (most recent first)
    let start = scroll_offset.min(state.laps.len());
    for lap in state.laps.iter().skip(start).take(max_visible) {
        writeln!(
            out,
            "Lap {:2}  {}{}",
            lap.lap_number,
            format_mm_ss_cs(lap.duration_ms),
            lap_marker(lap)
        )?;
    }
    let below = state.laps.len().saturating_sub(start + max_visible);
    if start > 0 || below > 0 {
        writeln!(out, "({} above, {} below)", start, below)?;
    }

    writeln!(out)?;
    draw_footer(out, state, state.laps.len() > max_visible)
}

fn draw_footer(out: &mut String, state: &Snapshot, scrollable: bool) -> std::fmt::Result {
    let mut hints = Vec::new();
    if state.can_start {
        hints.push("ENTER=start");
    }
    if state.can_stop {
        hints.push("ENTER=stop");
    }
    if state.can_resume {
        hints.push("ENTER=resume");
    }
    if state.can_lap {
        hints.push("l=lap");
    }
    if state.can_reset {
        hints.push("r=reset");
    }
    if scrollable {
        hints.push("j/k=scroll");
    }
    hints.push("q=quit");
    writeln!(out, "{}", hints.join("  "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stopwatch_core::StopwatchCore;

    fn render(state: &Snapshot, scroll_offset: usize, max_visible: usize) -> String {
        let mut out = String::new();
        draw_stopwatch(&mut out, state, scroll_offset, max_visible).unwrap();
        out
    }

    #[test]
    fn test_idle_screen() {
        let text = render(&StopwatchCore::new().snapshot(), 0, 10);
        assert!(text.contains("  00:00,00"));
        assert!(!text.contains("Lap"));
        assert!(text.contains("ENTER=start  q=quit"));
    }

    #[test]
    fn test_running_with_laps() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.lap(9000);
        sw.lap(12_000);
        sw.lap(15_000);
        sw.tick(20_000);
        let text = render(&sw.snapshot(), 0, 10);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "  00:20,00");
        assert_eq!(lines[4], "Lap  4  00:05,00");
        assert_eq!(lines[5], "Lap  3  00:03,00  fastest");
        assert_eq!(lines[6], "Lap  2  00:03,00  fastest");
        assert_eq!(lines[7], "Lap  1  00:09,00  slowest");
        assert!(text.contains("ENTER=stop  l=lap  q=quit"));
    }

    #[test]
    fn test_paused_footer_and_long_total() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.stop(ONE_HOUR_MS + 1_230);
        let text = render(&sw.snapshot(), 0, 10);
        assert!(text.contains("  01:00:01.23"));
        assert!(text.contains("ENTER=resume  r=reset  q=quit"));
    }

    #[test]
    fn test_scrolled_window() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        for t in 1..=5 {
            sw.lap(t * 1000);
        }
        let text = render(&sw.snapshot(), 2, 2);
        assert!(text.contains("Lap  4"));
        assert!(text.contains("Lap  3"));
        assert!(!text.contains("Lap  6"));
        assert!(!text.contains("Lap  2"));
        assert!(text.contains("(2 above, 2 below)"));
        assert!(text.contains("j/k=scroll"));
    }

    #[test]
    fn test_clear_screen_prefix() {
        let mut out = String::new();
        clear_screen(&mut out);
        assert!(out.starts_with("\x1b[2J"));
    }
}
