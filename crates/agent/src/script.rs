use upsell_core::flows::{
    ConversationState, CustomerIntent, FlowAction, FlowEvent, TransitionOutcome,
};
use upsell_core::offer::format::{CarOffer, OfferResponse};

pub const CONNECTION_TROUBLE: &str =
    "I'm having a little trouble connecting. Let me pass you to a human agent.";

pub fn opening(offer: &OfferResponse, customer_name: Option<&str>) -> String {
    let greeting = match customer_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("Hi {name}."),
        None => "Hi there.".to_string(),
    };

    format!(
        "{greeting} Unfortunately, the {normal} you selected is not available at the moment. \
The good news is that for just {delta} more, you can upgrade to the {upsell}. \
It feels noticeably faster and more responsive, getting you where you want in a second! \
You'll love it. How does it sound?",
        normal = offer.normal_car.name,
        delta = spoken_delta(&offer.upsell_car),
        upsell = offer.upsell_car.name,
    )
}

/// The agent's line after a completed flow step.
pub fn for_outcome(outcome: &TransitionOutcome, offer: &OfferResponse) -> String {
    let protection = &offer.protection;
    let has = |action: FlowAction| outcome.actions.contains(&action);

    if has(FlowAction::RepeatOffer) {
        return retry(outcome.from, offer);
    }
    if has(FlowAction::HandOffToHuman) {
        return match outcome.event {
            FlowEvent::Intent(CustomerIntent::Escalate) => {
                "I understand. I'm connecting you to a human specialist right now. Please hold."
                    .to_string()
            }
            _ => "I apologize, but I don't have other cars available. Let me get a manager to \
help you find a solution."
                .to_string(),
        };
    }
    if has(FlowAction::AcceptUpsell) {
        return format!(
            "Great choice! Now, for peace of mind, we recommend {}. It covers everything for {} \
a day. Shall we add it?",
            protection.name,
            spoken_amount(&protection.price),
        );
    }
    if has(FlowAction::AcceptComparable) {
        return format!(
            "Excellent. To stay safe, we propose our {}. {} Shall I include it?",
            protection.name, protection.description,
        );
    }
    if has(FlowAction::PitchComparable) {
        return format!(
            "No problem. In that case, I can offer you a {} at your original budget. Does that \
work for you?",
            offer.normal_car.name
        );
    }
    if has(FlowAction::AddProtection) {
        return "Perfect! Your car is protected. You can pick up your keys from Box number 4. \
Safe travels!"
            .to_string();
    }
    if has(FlowAction::ConfirmBooking) {
        return "Understood, standard coverage only. Your keys are in Box number 4. Drive safely!"
            .to_string();
    }
    if has(FlowAction::PitchUpsell) {
        return opening(offer, None);
    }

    "Could you please repeat that? I want to make sure I get your booking right.".to_string()
}

pub fn retry(state: ConversationState, offer: &OfferResponse) -> String {
    match state {
        ConversationState::UpsellOffer => format!(
            "I'm sorry, I didn't understand. Would you like to upgrade to the {} for just {}?",
            offer.upsell_car.name,
            spoken_delta(&offer.upsell_car),
        ),
        ConversationState::NormalOffer => {
            format!("Sorry, was that a yes for the {}?", offer.normal_car.name)
        }
        ConversationState::ProtectionOffer => format!(
            "I missed that. Do you want to add the {} for peace of mind?",
            offer.protection.name
        ),
        _ => "I didn't quite catch that.".to_string(),
    }
}

/// "+$18/day" reads as "18 dollars a day".
fn spoken_delta(car: &CarOffer) -> String {
    match car.price_delta.strip_prefix('+') {
        Some(rest) => format!("{} a day", spoken_amount(rest)),
        None => car.price_delta.to_lowercase(),
    }
}

fn spoken_amount(price: &str) -> String {
    let amount = price.trim_start_matches('$').trim_end_matches("/day");
    format!("{amount} dollars")
}
