use std::fmt;

/// Описание линейного многошагового диалога.
///
/// Каждый шаг принимает ввод через `accept`: при валидном вводе возвращается
/// обновлённый черновик, при невалидном `None`, и исходный черновик остаётся
/// нетронутым. Переходы задаёт `next`; `None` означает последний шаг.
pub trait Flow {
    type Step: Copy + PartialEq + fmt::Debug;
    type Draft: Default + Clone + PartialEq + fmt::Debug;

    const FIRST: Self::Step;

    fn accept(step: Self::Step, draft: &Self::Draft, input: &str) -> Option<Self::Draft>;

    fn next(step: Self::Step) -> Option<Self::Step>;
}

/// Результат одного шага.
#[derive(Debug, Clone, PartialEq)]
pub enum Feed<F: Flow> {
    /// ввод не принят, остаёмся на шаге
    Retry(F::Step),
    Next(F::Step),
    Complete(F::Draft),
}

/// Экземпляр диалога: текущий шаг и черновик.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation<F: Flow> {
    step: F::Step,
    draft: F::Draft,
}

impl<F: Flow> Conversation<F> {
    pub fn start() -> Self {
        Self {
            step: F::FIRST,
            draft: F::Draft::default(),
        }
    }

    pub fn step(&self) -> F::Step {
        self.step
    }

    pub fn feed(&mut self, input: &str) -> Feed<F> {
        let Some(draft) = F::accept(self.step, &self.draft, input) else {
            return Feed::Retry(self.step);
        };

        match F::next(self.step) {
            Some(next) => {
                self.step = next;
                self.draft = draft;
                Feed::Next(next)
            }
            None => {
                self.draft = draft.clone();
                Feed::Complete(draft)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Echo;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum EchoStep {
        First,
        Second,
    }

    impl Flow for Echo {
        type Step = EchoStep;
        type Draft = Vec<String>;

        const FIRST: EchoStep = EchoStep::First;

        fn accept(_step: EchoStep, draft: &Vec<String>, input: &str) -> Option<Vec<String>> {
            if input.is_empty() {
                return None;
            }
            let mut draft = draft.clone();
            draft.push(input.to_string());
            Some(draft)
        }

        fn next(step: EchoStep) -> Option<EchoStep> {
            match step {
                EchoStep::First => Some(EchoStep::Second),
                EchoStep::Second => None,
            }
        }
    }

    #[test]
    fn walks_steps_until_complete() {
        let mut conversation = Conversation::<Echo>::start();
        assert_eq!(conversation.step(), EchoStep::First);

        assert_eq!(conversation.feed("a"), Feed::Next(EchoStep::Second));
        assert_eq!(
            conversation.feed("b"),
            Feed::Complete(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn invalid_input_keeps_step_and_draft() {
        let mut conversation = Conversation::<Echo>::start();
        conversation.feed("a");
        let before = conversation.clone();

        assert_eq!(conversation.feed(""), Feed::Retry(EchoStep::Second));
        assert_eq!(conversation, before);
    }
}
