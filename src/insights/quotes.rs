use rand::seq::SliceRandom;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: &[Quote] = &[
    Quote {
        text: "The secret of getting ahead is getting started.",
        author: "Mark Twain",
    },
    Quote {
        text: "It always seems impossible until it's done.",
        author: "Nelson Mandela",
    },
    Quote {
        text: "Don't watch the clock; do what it does. Keep going.",
        author: "Sam Levenson",
    },
    Quote {
        text: "The only way to do great work is to love what you do.",
        author: "Steve Jobs",
    },
    Quote {
        text: "Believe you can and you're halfway there.",
        author: "Theodore Roosevelt",
    },
    Quote {
        text: "Your limitation is only your imagination.",
        author: "Unknown",
    },
    Quote {
        text: "Push yourself, because no one else is going to do it for you.",
        author: "Unknown",
    },
    Quote {
        text: "Great things never come from comfort zones.",
        author: "Unknown",
    },
    Quote {
        text: "Dream it. Wish it. Do it.",
        author: "Unknown",
    },
    Quote {
        text: "Success doesn't just find you. You have to go out and get it.",
        author: "Unknown",
    },
    Quote {
        text: "The harder you work for something, the greater you'll feel when you achieve it.",
        author: "Unknown",
    },
    Quote {
        text: "Don't stop when you're tired. Stop when you're done.",
        author: "Unknown",
    },
    Quote {
        text: "Wake up with determination. Go to bed with satisfaction.",
        author: "Unknown",
    },
    Quote {
        text: "Little things make big days.",
        author: "Unknown",
    },
    Quote {
        text: "It's going to be hard, but hard does not mean impossible.",
        author: "Unknown",
    },
];

pub fn random_quote() -> Quote {
    *QUOTES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&QUOTES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_quote_comes_from_the_list() {
        for _ in 0..20 {
            assert!(QUOTES.contains(&random_quote()));
        }
    }
}
