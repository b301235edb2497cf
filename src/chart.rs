//! Chart renderers for summarized grade history.
//!
//! A renderer draws one chart per [`TermGroup`] and owns its hover state, so a
//! front end only forwards "pointer is over bar N of chart M" and gets back the
//! tooltip to show.

use std::fmt;
use std::fmt::Write;

use crate::models::{Grade, TermGroup};

const BAR_CELL: char = '\u{2588}';

pub trait ChartRenderer {
    /// Lays out and draws every group. Replaces any previous layout and clears hover.
    fn render(&mut self, groups: &[TermGroup]) -> anyhow::Result<String>;

    /// Moves the pointer over `bar` of `chart`. Out of range clears the hover.
    fn hover(&mut self, chart: usize, bar: usize) -> Option<Tooltip>;

    fn hovered(&self) -> Option<(usize, usize)>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipItem {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub label: String,
    pub items: Vec<TooltipItem>,
}

impl Tooltip {
    pub fn for_bar(bar: &Bar) -> Self {
        Tooltip {
            label: bar.grade.to_string(),
            items: vec![TooltipItem {
                name: "count".to_string(),
                value: bar.count.to_string(),
            }],
        }
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.label)?;
        for item in &self.items {
            writeln!(f, "{} : {}", item.name, item.value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub grade: Grade,
    pub count: usize,
}

fn layout_bars(group: &TermGroup, show_empty: bool) -> Vec<Bar> {
    group
        .counts
        .iter()
        .filter(|(grade, count)| {
            **count > 0 || (show_empty && **grade != Grade::Other)
        })
        .map(|(grade, count)| Bar {
            grade: *grade,
            count: *count,
        })
        .collect()
}

/// Hover bookkeeping shared by the renderers.
#[derive(Debug, Default)]
struct HoverState {
    layout: Vec<Vec<Bar>>,
    hovered: Option<(usize, usize)>,
}

impl HoverState {
    fn reset(&mut self, layout: Vec<Vec<Bar>>) {
        self.layout = layout;
        self.hovered = None;
    }

    fn hover(&mut self, chart: usize, bar: usize) -> Option<Tooltip> {
        match self.layout.get(chart).and_then(|bars| bars.get(bar)) {
            Some(found) => {
                self.hovered = Some((chart, bar));
                Some(Tooltip::for_bar(found))
            }
            None => {
                self.hovered = None;
                None
            }
        }
    }
}

/// Horizontal bar charts drawn with block characters.
#[derive(Debug)]
pub struct TextBarChart {
    width: usize,
    show_empty: bool,
    state: HoverState,
}

impl TextBarChart {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            show_empty: false,
            state: HoverState::default(),
        }
    }

    pub fn show_empty(mut self, show_empty: bool) -> Self {
        self.show_empty = show_empty;
        self
    }

    fn bar_len(&self, count: usize, max: usize) -> usize {
        if count == 0 || max == 0 {
            return 0;
        }
        (count * self.width / max).max(1)
    }
}

impl Default for TextBarChart {
    fn default() -> Self {
        Self::new(40)
    }
}

impl ChartRenderer for TextBarChart {
    fn render(&mut self, groups: &[TermGroup]) -> anyhow::Result<String> {
        let layout: Vec<Vec<Bar>> = groups
            .iter()
            .map(|g| layout_bars(g, self.show_empty))
            .collect();

        let mut output = String::new();

        for (index, (group, bars)) in groups.iter().zip(&layout).enumerate() {
            if index > 0 {
                writeln!(output)?;
            }
            writeln!(output, "{}", group.label())?;

            let max = bars.iter().map(|b| b.count).max().unwrap_or(0);
            for (bar_index, bar) in bars.iter().enumerate() {
                let marker = if self.state.hovered == Some((index, bar_index)) {
                    '>'
                } else {
                    ' '
                };
                let cells: String =
                    std::iter::repeat(BAR_CELL).take(self.bar_len(bar.count, max)).collect();
                writeln!(
                    output,
                    "{marker} {:<5} | {cells} {}",
                    bar.grade.as_str(),
                    bar.count
                )?;
            }
        }

        self.state.reset(layout);
        Ok(output)
    }

    fn hover(&mut self, chart: usize, bar: usize) -> Option<Tooltip> {
        self.state.hover(chart, bar)
    }

    fn hovered(&self) -> Option<(usize, usize)> {
        self.state.hovered
    }
}

/// Emits the groups as JSON for a renderer living outside this process.
#[derive(Debug, Default)]
pub struct JsonChart {
    state: HoverState,
}

impl ChartRenderer for JsonChart {
    fn render(&mut self, groups: &[TermGroup]) -> anyhow::Result<String> {
        self.state
            .reset(groups.iter().map(|g| layout_bars(g, false)).collect());
        Ok(serde_json::to_string_pretty(groups)?)
    }

    fn hover(&mut self, chart: usize, bar: usize) -> Option<Tooltip> {
        self.state.hover(chart, bar)
    }

    fn hovered(&self) -> Option<(usize, usize)> {
        self.state.hovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GradeRecord, Quarter};
    use crate::summary::summarize;

    fn one_quarter() -> Vec<TermGroup> {
        let grades = [
            Grade::A,
            Grade::A,
            Grade::AMinus,
            Grade::BPlus,
            Grade::B,
            Grade::BMinus,
            Grade::C,
            Grade::F,
        ];
        let records: Vec<GradeRecord> = grades
            .into_iter()
            .map(|grade| GradeRecord {
                quarter: Quarter::Fall,
                year: 2009,
                instructor: "GONZALEZ T F".to_string(),
                course_id: "CMPSC 156".to_string(),
                grade,
            })
            .collect();
        summarize(&records)
    }

    #[test]
    fn empty_history_renders_nothing() {
        let mut chart = TextBarChart::default();
        assert_eq!(chart.render(&[]).unwrap(), "");
        assert!(chart.hover(0, 0).is_none());
    }

    #[test]
    fn one_quarter_draws_labelled_chart_with_a_bar_per_grade() {
        let mut chart = TextBarChart::new(10);
        let text = chart.render(&one_quarter()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Fall 2009 - GONZALEZ T F");
        assert_eq!(lines.len(), 1 + 7);
        assert!(lines[1].starts_with("  A     | "));
        assert!(lines[1].ends_with(" 2"));
        assert_eq!(lines[1].matches(BAR_CELL).count(), 10);
        assert_eq!(lines[2].matches(BAR_CELL).count(), 5);
    }

    #[test]
    fn show_empty_draws_every_letter_but_other() {
        let mut chart = TextBarChart::new(10).show_empty(true);
        let text = chart.render(&one_quarter()).unwrap();
        assert_eq!(text.lines().count(), 1 + Grade::ALL.len() - 1);
        assert!(text.contains("  A+    |  0"));
    }

    #[test]
    fn hover_formats_tooltip_for_bar() {
        let mut chart = TextBarChart::default();
        chart.render(&one_quarter()).unwrap();

        let tooltip = chart.hover(0, 0).unwrap();
        assert_eq!(tooltip.label, "A");
        assert_eq!(tooltip.items.len(), 1);
        assert_eq!(tooltip.items[0].name, "count");
        assert_eq!(tooltip.items[0].value, "2");
        assert_eq!(tooltip.to_string(), "A\ncount : 2\n");
        assert_eq!(chart.hovered(), Some((0, 0)));
    }

    #[test]
    fn hovered_bar_is_marked_on_next_render() {
        let groups = one_quarter();
        let mut chart = TextBarChart::default();
        chart.render(&groups).unwrap();
        chart.hover(0, 1);

        let text = chart.render(&groups).unwrap();
        assert!(text.lines().nth(2).unwrap().starts_with("> A-"));
        assert_eq!(chart.hovered(), None);
    }

    #[test]
    fn hover_out_of_range_clears_state() {
        let mut chart = TextBarChart::default();
        chart.render(&one_quarter()).unwrap();
        chart.hover(0, 3).unwrap();

        assert!(chart.hover(0, 7).is_none());
        assert!(chart.hover(1, 0).is_none());
        assert_eq!(chart.hovered(), None);
    }

    #[test]
    fn json_chart_serializes_groups_and_hovers() {
        let mut chart = JsonChart::default();
        let text = chart.render(&one_quarter()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value[0]["label"], "Fall 2009 - GONZALEZ T F");
        assert_eq!(value[0]["quarter"], "Fall");
        assert_eq!(value[0]["total"], 8);
        assert_eq!(value[0]["counts"]["A"], 2);
        assert_eq!(value[0]["counts"]["A+"], 0);

        let tooltip = chart.hover(0, 6).unwrap();
        assert_eq!(tooltip.label, "F");
        assert_eq!(tooltip.items[0].value, "1");
    }
}
