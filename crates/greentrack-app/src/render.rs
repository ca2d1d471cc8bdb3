//! Text rendering of the active screen.

use std::fmt::Write;

use greentrack_core::{
    ChatSession, DecisionTreeNavigator, GameEngine, InfoPageState, NavigationState, QuizEngine,
    QuizPhase, ViewCoordinator,
};
use greentrack_types::{Severity, SwipeDirection};

const RULE: &str = "------------------------------------------------------------";

/// Render the active screen, plus the credits overlay when it is showing.
pub fn render(coordinator: &ViewCoordinator) -> String {
    let mut out = String::new();
    match coordinator.state() {
        NavigationState::Loading => out.push_str("GreenTrack\n\nLoading...\n"),
        NavigationState::IntroAnimation { .. } => {
            let _ = writeln!(out, "\n    {}\n", coordinator.intro_word().unwrap_or_default());
        }
        NavigationState::CardFlow(nav) => render_card(&mut out, nav),
        NavigationState::InfoPage(page) => render_page(&mut out, page),
        NavigationState::Quiz(quiz) => render_quiz(&mut out, coordinator, quiz),
        NavigationState::Game(game) => render_game(&mut out, coordinator, game),
        NavigationState::Chat(chat) => render_chat(&mut out, chat),
    }

    if coordinator.credits_visible() {
        let _ = writeln!(out, "{RULE}\nCredits & Citations");
        for section in coordinator.citations() {
            let _ = writeln!(out, "\n{}", section.title);
            for source in &section.sources {
                let _ = writeln!(out, "  - {source}");
            }
        }
        out.push_str("\n(type 'close' to hide)\n");
    }
    out
}

fn render_card(out: &mut String, nav: &DecisionTreeNavigator) {
    let card = nav.current();
    let _ = writeln!(out, "{RULE}\n{}\n{RULE}", card.prompt);
    let left = card.choice(SwipeDirection::Left).map_or("", |c| c.label.as_str());
    let right = card.choice(SwipeDirection::Right).map_or("", |c| c.label.as_str());
    let _ = writeln!(out, "<- {left}    |    {right} ->");
    if let Some(preview) = nav.preview() {
        let _ = writeln!(
            out,
            "(leaning {:?}: {} {:.0}%)",
            preview.direction,
            preview.label,
            preview.opacity * 100.0
        );
    }
}

fn render_page(out: &mut String, state: &InfoPageState) {
    let page = state.page();
    let _ = writeln!(out, "{RULE}\n{}\n{RULE}", page.title);
    if !page.intro.is_empty() {
        let _ = writeln!(out, "{}\n", page.intro);
    }

    if !page.statistics.is_empty() {
        out.push_str("Key Statistics\n");
        for stat in &page.statistics {
            let _ = writeln!(out, "  {}: {}\n    {}", stat.title, stat.value, stat.description);
        }
        out.push('\n');
    }

    if let (Some(first), Some(last)) = (page.timeline.first(), page.timeline.last()) {
        let _ = writeln!(
            out,
            "Timeline {}-{}, showing {} (type 'year <yyyy>')",
            first.year,
            last.year,
            state.selected_year().unwrap_or(last.year)
        );
    }
    if let Some(reading) = state.reading() {
        let _ = writeln!(
            out,
            "Year: {}\n  Efficiency Gain {}%  Emissions Reduction {}%  Waste Reduction {}%\n",
            reading.year,
            reading.efficiency_gain,
            reading.emissions_reduction,
            reading.waste_reduction
        );
    }

    if !page.projection.is_empty() {
        out.push_str("Projected carbon intensity with AI\n");
        for point in &page.projection {
            let _ = writeln!(out, "  {}: {}", point.year, point.value);
        }
        if !page.projection_caption.is_empty() {
            let _ = writeln!(out, "  {}", page.projection_caption);
        }
        out.push('\n');
    }

    if !page.benefits.is_empty() {
        out.push_str("Benefits (type 'benefit <id>')\n");
        for benefit in &page.benefits {
            let expanded = state.expanded_benefit() == Some(benefit.id);
            let marker = if expanded { "v" } else { ">" };
            let _ = writeln!(out, "  {marker} [{}] {}: {}", benefit.id, benefit.title, benefit.description);
            if expanded {
                for detail in &benefit.details {
                    let _ = writeln!(out, "      {}: {}", detail.title, detail.description);
                }
            }
        }
        out.push('\n');
    }

    if !page.case_studies.is_empty() {
        out.push_str("Case Studies\n");
        for study in &page.case_studies {
            let _ = writeln!(out, "  {}\n    {}", study.title, study.description);
        }
        out.push('\n');
    }

    for figure in &page.figures {
        let _ = writeln!(out, "[figure: {}] {}\n  {}", figure.asset, figure.title, figure.caption);
    }

    if !page.strategies.is_empty() {
        out.push_str("\nMitigation Strategies\n");
        for strategy in &page.strategies {
            let _ = writeln!(
                out,
                "  {}: {}\n    {}",
                strategy.title, strategy.description, strategy.example
            );
        }
    }

    if page.footprint_calculator {
        out.push_str("Carbon Footprint Calculator (type 'footprint <kWh per year>')\n");
        match state.footprint() {
            Some(tonnes) => {
                let _ = writeln!(out, "  Estimated footprint: {tonnes} tonnes CO2 per year");
            }
            None => out.push_str("  No estimate yet.\n"),
        }
    }
}

fn render_quiz(out: &mut String, coordinator: &ViewCoordinator, quiz: &QuizEngine) {
    let content = coordinator.content().quiz();
    let _ = writeln!(out, "{RULE}\n{}\n{RULE}", content.title);
    match quiz.phase() {
        QuizPhase::Welcome => {
            for paragraph in &content.welcome {
                let _ = writeln!(out, "{paragraph}\n");
            }
            out.push_str("Type 'start' to begin.\n");
        }
        QuizPhase::Answering => {
            let Some(question) = quiz.current_question() else {
                return;
            };
            let _ = writeln!(
                out,
                "Question {} of {}    Score: {}\n\n{}\n",
                quiz.index().saturating_add(1),
                quiz.total(),
                quiz.score(),
                question.prompt
            );
            for (i, option) in question.options.iter().enumerate() {
                let marker = match quiz.selected() {
                    Some(_) if i == question.correct_answer => "[correct]",
                    Some(selected) if selected == i => "[wrong]",
                    _ => "",
                };
                let _ = writeln!(out, "  {}. {option} {marker}", i.saturating_add(1));
            }
            if quiz.explanation_shown() {
                let _ = writeln!(out, "\n{}\n\nType 'next' to continue.", question.explanation);
            }
        }
        QuizPhase::Complete => {
            let _ = writeln!(out, "Final score: {} / {}", quiz.score(), quiz.total());
        }
    }
}

fn render_game(out: &mut String, coordinator: &ViewCoordinator, game: &GameEngine) {
    let _ = writeln!(out, "{RULE}\n{}\n{RULE}", coordinator.content().game().title);
    if let Some(feedback) = game.final_feedback() {
        let label = match feedback.severity {
            Severity::Positive => "great",
            Severity::Informative => "good",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        };
        let _ = writeln!(
            out,
            "Final sustainability score: {}\n[{label}] {}\n\nType 'restart' to start over.",
            feedback.score, feedback.message
        );
        return;
    }
    let Some(decision) = game.current_decision() else {
        return;
    };
    let _ = writeln!(
        out,
        "Decision {} of {}    Sustainability score: {}\n\n{}\n",
        game.index().saturating_add(1),
        game.total(),
        game.score(),
        decision.prompt
    );
    for (i, (option, impact)) in decision.options.iter().zip(&decision.impacts).enumerate() {
        let _ = writeln!(
            out,
            "  {}. {option} ({:+})\n     {}",
            i.saturating_add(1),
            impact.sustainability,
            impact.note
        );
    }
    let _ = writeln!(out, "\n{}", decision.educational_note);
}

fn render_chat(out: &mut String, chat: &ChatSession) {
    let _ = writeln!(out, "{RULE}\nCarbon Footprint Assistant\n{RULE}");
    for message in chat.messages() {
        let who = if message.is_user() { "You" } else { "Assistant" };
        let _ = writeln!(out, "{who}: {}", message.text);
        if let Some(options) = &message.options {
            let _ = writeln!(out, "    ({})", options.join(" / "));
        }
    }
    if !chat.input().is_empty() {
        let _ = writeln!(out, "\n> {}", chat.input());
    }
}
