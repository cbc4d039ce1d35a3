//! Color palettes for the interview client.
//!
//! - Intake stages (blue tones): mode selection, resume upload, role selection
//! - Interview stages (orange tones): setup and the live session
//! - Feedback (green tones)
//!
//! Semantic colors (success=green, error=red) are the same in every theme.

use crate::orchestrator::WorkflowStage;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    // === Primary colors ===
    /// Main text color
    pub text: Color,
    /// Muted/secondary text color
    pub muted: Color,
    /// Primary accent color (active elements, highlights)
    pub accent: Color,

    // === Border colors ===
    pub border: Color,
    pub border_focused: Color,

    // === Semantic colors (consistent across themes) ===
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // === Header ===
    /// Background of the stage title bar
    pub header_bg: Color,
}

impl Theme {
    /// Blue-toned theme for intake stages and the sign-in screens.
    pub fn intake() -> Self {
        Self {
            text: Color::White,
            muted: Color::DarkGray,
            accent: Color::Rgb(100, 180, 255), // Sky blue
            border: Color::Rgb(60, 100, 160),  // Steel blue
            border_focused: Color::Rgb(130, 200, 255),
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            header_bg: Color::Rgb(20, 60, 120),
        }
    }

    /// Orange-toned theme while the interview runs.
    pub fn interview() -> Self {
        Self {
            accent: Color::Rgb(255, 165, 0), // Orange
            border: Color::Rgb(160, 90, 40),
            border_focused: Color::Rgb(255, 190, 90),
            header_bg: Color::Rgb(100, 50, 20),
            ..Self::intake()
        }
    }

    /// Green-toned theme for the feedback report.
    pub fn feedback() -> Self {
        Self {
            accent: Color::Rgb(150, 255, 150),
            border: Color::Rgb(40, 120, 60),
            border_focused: Color::Rgb(120, 220, 140),
            header_bg: Color::Rgb(20, 80, 40),
            ..Self::intake()
        }
    }

    pub fn for_stage(stage: WorkflowStage) -> Self {
        match stage {
            WorkflowStage::ModeSelection
            | WorkflowStage::ResumeUpload
            | WorkflowStage::RoleSelection => Self::intake(),
            WorkflowStage::InterviewSetup | WorkflowStage::InterviewSession => Self::interview(),
            WorkflowStage::Feedback => Self::feedback(),
        }
    }
}
