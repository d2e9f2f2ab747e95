use crate::core::dates::format_short;
use crate::domain::model::{BookingInquiry, DateRange, Item};
use crate::utils::error::{Result, VillaError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};

/// Fixed lines that frame every outgoing WhatsApp message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTemplate {
    pub marker: String,
    pub call_to_action: String,
    pub signature: String,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            marker: "🚨🚨🚨🚨🚨".to_string(),
            call_to_action: "Dibantu Cek Availability Kak".to_string(),
            signature: "*VillaSepuncak*".to_string(),
        }
    }
}

/// Builds the text handed to the chat app. Pure and deterministic.
#[derive(Debug, Clone, Default)]
pub struct MessageComposer {
    template: MessageTemplate,
}

impl MessageComposer {
    pub fn new(template: MessageTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &MessageTemplate {
        &self.template
    }

    pub fn compose_single(&self, item: &Item, range: Option<&DateRange>) -> String {
        self.compose_blocks(std::slice::from_ref(item), range)
    }

    /// One block per villa in the given order, then a single closing.
    pub fn compose_multiple(&self, items: &[Item], range: Option<&DateRange>) -> Result<String> {
        if items.is_empty() {
            return Err(VillaError::EmptyRecipientSet);
        }
        Ok(self.compose_blocks(items, range))
    }

    /// Message for the general booking form.
    pub fn compose_inquiry(&self, inquiry: &BookingInquiry) -> Result<String> {
        inquiry.validate()?;

        let range = &inquiry.range;
        let mut lines = vec![
            "New Booking Inquiry:".to_string(),
            String::new(),
            format!("*Check In:* {}", range.check_in().format("%Y-%m-%d")),
            format!("*Check Out:* {}", range.check_out().format("%Y-%m-%d")),
            format!("*Malam:* {}", range.nights()),
            format!("*Adults:* {}", inquiry.adults),
            format!("*Children:* {}", inquiry.children),
        ];

        if !inquiry.children_ages.is_empty() {
            let ages: Vec<String> = inquiry.children_ages.iter().map(u8::to_string).collect();
            lines.push(format!("*Children Ages:* {}", ages.join(", ")));
        }

        let notes = inquiry
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("None");
        lines.push(format!("*Special Requests:* {}", notes));
        lines.push(String::new());
        lines.push("Please contact the guest as soon as possible.".to_string());

        Ok(lines.join("\n"))
    }

    fn compose_blocks(&self, items: &[Item], range: Option<&DateRange>) -> String {
        let mut lines = vec![self.template.marker.clone()];

        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                lines.push(String::new());
            }
            lines.extend(item_block(item, range));
        }

        lines.push(String::new());
        lines.push(self.template.call_to_action.clone());
        lines.push(self.template.signature.clone());
        lines.join("\n")
    }
}

fn item_block(item: &Item, range: Option<&DateRange>) -> Vec<String> {
    let mut lines = vec![
        item.title.clone(),
        format!("Location: {}", item.location),
        format!("Rating: {}", item.rating),
    ];

    if let Some(range) = range {
        lines.push(String::new());
        lines.push(format!("Check-In: {}", format_short(range.check_in())));
        lines.push(format!("Check-Out: {}", format_short(range.check_out())));
        lines.push(format!("Total: {:02} Malam", range.nights()));
    }
    lines
}
