/// Defines experiment phases and their behavior.
pub trait Phase: Copy + Clone + PartialEq + Send + Sync + std::fmt::Debug + Default {
    fn next(&self) -> Option<Self>;

    fn is_welcome(&self) -> bool {
        false
    }
    fn is_practice(&self) -> bool {
        false
    }
    fn is_main(&self) -> bool {
        false
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Default)]
pub enum StandardPhase {
    #[default]
    Welcome,
    Practice,
    Main,
    Debrief,
}

impl Phase for StandardPhase {
    fn next(&self) -> Option<Self> {
        use StandardPhase::*;
        Some(match self {
            Welcome => Practice,
            Practice => Main,
            Main => Debrief,
            Debrief => return None,
        })
    }

    fn is_welcome(&self) -> bool {
        matches!(self, StandardPhase::Welcome)
    }

    fn is_practice(&self) -> bool {
        matches!(self, StandardPhase::Practice)
    }

    fn is_main(&self) -> bool {
        matches!(self, StandardPhase::Main)
    }
}
