//! XML export of the team table with full control sequences

use crate::relay::RelayVariations;

/// One `<team>` element per team, one `<leg>` per cell with its control path
pub fn write_xml(relay: &RelayVariations, course_name: &str) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<relay-variations course=\"{}\" first-team=\"{}\" last-team=\"{}\" legs=\"{}\">\n",
        escape(course_name),
        relay.first_team_number(),
        relay.last_team_number(),
        relay.number_of_legs()
    ));
    for team in relay.first_team_number()..=relay.last_team_number() {
        out.push_str(&format!("  <team number=\"{}\">\n", team));
        for leg in 0..relay.number_of_legs() {
            let variation = relay.variation(team, leg);
            let controls = variation
                .controls
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&format!(
                "    <leg number=\"{}\" variation=\"{}\">{}</leg>\n",
                leg + 1,
                escape(variation.code_string),
                escape(&controls)
            ));
        }
        out.push_str("  </team>\n");
    }
    out.push_str("</relay-variations>\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::CourseSet;
    use crate::parser::parse;
    use crate::settings::RelaySettings;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_xml_structure() {
        let file = parse("course twoway { start 31 fork { 32 33 | 34 } 36 finish }").unwrap();
        let set = CourseSet::from_ast(&file).unwrap();
        let relay = RelayVariations::new(set.first().unwrap(), &RelaySettings::new(1, 1, 1));
        assert_eq!(
            write_xml(&relay, "twoway"),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <relay-variations course=\"twoway\" first-team=\"1\" last-team=\"1\" legs=\"1\">\n\
             \x20 <team number=\"1\">\n\
             \x20   <leg number=\"1\" variation=\"A\">start,31,32,33,36,finish</leg>\n\
             \x20 </team>\n\
             </relay-variations>\n"
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
