//! Canned answers for common questions, matched by keyword.

pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
    pub keywords: &'static [&'static str],
}

/// Order matters: the first entry with a matching keyword answers.
pub static FAQ: [FaqEntry; 8] = [
    FaqEntry {
        question: "How do I book a trip?",
        answer: "Open a destination, press Book Now, pick the services you need (hotel, \
                 transport, guide), enter traveler details and dates, then confirm. \
                 Your booking appears under My Bookings right away.",
        keywords: &["booking", "how do i book", "how to book", "reservation"],
    },
    FaqEntry {
        question: "Can I cancel a booking?",
        answer: "Yes. Go to My Bookings and choose Cancel on the booking. Cancelled \
                 bookings stay in your history with the status cancelled.",
        keywords: &["cancel", "refund"],
    },
    FaqEntry {
        question: "What payment methods are accepted?",
        answer: "We accept credit and debit cards, UPI and net banking. Card is the \
                 default method at checkout.",
        keywords: &["payment", "pay with", "pay by", " upi", "credit card", "debit card", "net banking"],
    },
    FaqEntry {
        question: "How is the price calculated?",
        answer: "Each selected option is priced per traveler. The base amount is the sum \
                 of option prices times the number of travelers, and 18% GST is added on \
                 top to give the total.",
        keywords: &["price", "how much", "total cost", "cost of", "gst", "tax rate"],
    },
    FaqEntry {
        question: "When is the best time to visit India?",
        answer: "October to March is pleasant for most of India. The hills are best from \
                 April to June, and the Western Ghats are greenest in the monsoon from \
                 July to September.",
        keywords: &["best time", "when to visit", "season", "monsoon"],
    },
    FaqEntry {
        question: "How do weather suggestions work?",
        answer: "We check live weather for each destination and compare it with the \
                 weather the place is best enjoyed in. The Weather Picks list shows \
                 places that are comfortable right now.",
        keywords: &["weather", "temperature", "climate"],
    },
    FaqEntry {
        question: "How do I plan a multi-stop trip?",
        answer: "Use the Trip Planner: add destinations in the order you want to visit, \
                 set your dates and save the plan. Saved plans are listed under My Plans.",
        keywords: &["trip plan", "plan a trip", "plan my trip", "itinerary", "multi-stop", "saved plan"],
    },
    FaqEntry {
        question: "Do I need a visa to visit India?",
        answer: "Most foreign nationals need a visa. Many countries are eligible for an \
                 e-Visa, which you can apply for online on the official Indian government \
                 portal at least four days before arrival.",
        keywords: &["need a visa", "tourist visa", "visa on arrival", "e-visa", "passport"],
    },
];

/// First entry (table order) whose keyword occurs in the lower-cased message.
pub fn match_faq(message: &str) -> Option<&'static FaqEntry> {
    let message = message.to_lowercase();
    FAQ.iter()
        .find(|entry| entry.keywords.iter().any(|k| message.contains(k)))
}

/// The FAQ table rendered as context for the generative provider.
pub fn context() -> String {
    FAQ.iter()
        .map(|e| format!("Q: {}\nA: {}", e.question, e.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}
