use crate::models::{Role, StepEvent};
use crate::ui::Renderer;
use std::io::Write;
use std::sync::Mutex;

/// Renderer that prints one line per step
///
/// Each line shows the sequence number, the step kind and the array, with
/// marked indices decorated by role:
///
/// ```text
///   12 compare      [ 3 <5> <8>  1 ]
///   13 pivot        [ 1  3 {5}  8 ]  range 0..3  pivot 5
/// ```
pub struct TerminalRenderer<W: Write + Send = std::io::Stdout> {
    out: Mutex<W>,
}

impl TerminalRenderer {
    /// Renderer writing to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Format one step as a single line
    pub fn format_step(event: &StepEvent) -> String {
        let cells: Vec<String> = event
            .array
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let role = event
                    .marks
                    .iter()
                    .rev()
                    .find(|m| m.index == index)
                    .map(|m| m.role);
                match role {
                    Some(Role::Compared) => format!("<{}>", value),
                    Some(Role::Swapped) => format!("*{}*", value),
                    Some(Role::Pivot) => format!("{{{}}}", value),
                    Some(Role::Found) => format!("({})", value),
                    Some(Role::Eliminated) => format!("-{}-", value),
                    Some(Role::LeftRun) => format!("{}<", value),
                    Some(Role::RightRun) => format!(">{}", value),
                    Some(Role::PartitionBound | Role::MergeSource | Role::SearchRange) => {
                        format!("'{}'", value)
                    }
                    None => format!(" {} ", value),
                }
            })
            .collect();

        let mut line = format!("{:>4} {:<12} [{}]", event.seq, event.kind, cells.join(""));

        if let Some((left, right)) = event.meta.bounds {
            line.push_str(&format!("  range {}..{}", left, right));
        }
        if let Some(pivot) = event.meta.pivot {
            line.push_str(&format!("  pivot {}", pivot));
        }
        if let Some((left, right)) = &event.meta.merging {
            line.push_str(&format!("  merging {:?} + {:?}", left, right));
        }
        if let Some(target) = event.meta.target {
            line.push_str(&format!("  target {}", target));
        }
        if let Some(count) = event.meta.comparisons {
            line.push_str(&format!("  comparisons {}", count));
        }

        line
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn on_step(&self, event: &StepEvent) {
        let line = Self::format_step(event);
        let mut out = self.out.lock().unwrap();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write step to terminal: {}", e);
        }
    }
}
