//! Static per-sector action tables
//!
//! Fallback recommendations used when the generative model is unavailable.
//! Each (sector, rain level) pair maps to a short list of prioritized
//! actions.

use shared::{Priority, RainLevel, Recommendation, Sector, Timeframe};

fn rec(title: &str, description: &str, priority: Priority, timeframe: Timeframe) -> Recommendation {
    Recommendation {
        title: title.to_string(),
        description: description.to_string(),
        priority,
        timeframe,
    }
}

/// Action list for a sector under a rain level
pub fn actions(sector: Sector, level: RainLevel) -> Vec<Recommendation> {
    use Priority::*;
    use RainLevel::*;
    use Sector::*;
    use Timeframe::*;

    match (sector, level) {
        (Agriculture, Minimal) => vec![
            rec("Irrigation & Fertilization", "Ideal day for irrigation and fertilizer application without waterlogging risk.", High, Today),
            rec("Harvesting Operations", "Dry ground allows efficient harvesting of mature crops.", High, Today),
            rec("Field Preparation", "Good conditions for plowing, seeding, and field maintenance.", Medium, Today),
        ],
        (Agriculture, Light) => vec![
            rec("Complete Morning Tasks", "Finish irrigation and spraying before rain arrives.", High, Immediate),
            rec("Protect Harvested Crops", "Cover crops stored outdoors; light rain damages dried grain and hay.", Medium, Immediate),
            rec("Monitor Soil Conditions", "Check soil moisture afterwards and adjust irrigation schedules.", Medium, Today),
        ],
        (Agriculture, Moderate) => vec![
            rec("Halt Outdoor Operations", "Stop irrigation, spraying, and harvesting; rain interferes with equipment.", High, Immediate),
            rec("Livestock Care", "Move animals to sheltered, dry feeding areas.", High, Immediate),
            rec("Drainage Check", "Watch field drainage to prevent waterlogging in low areas.", Medium, Today),
        ],
        (Agriculture, Heavy) => vec![
            rec("Complete Work Stoppage", "Halt all outdoor farming activities; heavy rain risks safety and equipment.", High, Immediate),
            rec("Secure Livestock & Equipment", "Shelter animals and protect machinery from flooding.", High, Immediate),
            rec("Emergency Preparedness", "Check supplies and communication systems for severe weather.", High, Immediate),
        ],

        (Construction, Minimal) => vec![
            rec("Concrete & Masonry Work", "Good temperature and humidity for pouring, curing, and masonry.", High, Today),
            rec("Exterior Finishing", "Painting and roofing can cure without weather interference.", High, Today),
            rec("Material Deliveries", "Schedule weather-sensitive material deliveries.", Medium, Today),
        ],
        (Construction, Light) => vec![
            rec("Indoor Construction Focus", "Shift to interior, electrical, plumbing, and HVAC work.", High, Today),
            rec("Cover Materials", "Tarp cement, drywall, and other moisture-sensitive stock.", High, Immediate),
            rec("Safety Precautions", "Raise slip-hazard awareness and check worker footwear.", Medium, Immediate),
        ],
        (Construction, Moderate) => vec![
            rec("Stop Outdoor Work", "Halt concrete pours, roofing, and exterior work.", High, Immediate),
            rec("Equipment Protection", "Cover or secure outdoor equipment and materials.", High, Immediate),
            rec("Focus on Interior Tasks", "Use downtime for indoor finishing and planning.", Medium, Today),
        ],
        (Construction, Heavy) => vec![
            rec("Complete Site Shutdown", "Stop all activity; heavy rain poses serious safety risks.", High, Immediate),
            rec("Secure Structures", "Tie down scaffolding, temporary structures, and loose materials.", High, Immediate),
            rec("Emergency Protocols", "Review procedures and verify communication systems.", High, Immediate),
        ],

        (Logistics, Minimal) => vec![
            rec("Maximize Deliveries", "Clear roads and visibility; schedule time-sensitive shipments.", High, Today),
            rec("Route Optimization", "Use the window to shorten routes and delivery times.", Medium, Today),
            rec("Vehicle Maintenance", "Fit in outdoor vehicle inspections while dry.", Low, ThisWeek),
        ],
        (Logistics, Light) => vec![
            rec("Continue Regular Schedule", "Keep schedules with lower speeds and longer following distance.", Medium, Today),
            rec("Cargo Protection", "Use covered loading areas and protect moisture-sensitive cargo.", High, Immediate),
            rec("Driver Safety Briefing", "Brief drivers on wet-road technique and route conditions.", Medium, Immediate),
        ],
        (Logistics, Moderate) => vec![
            rec("Implement Safety Protocols", "Reduced speeds, longer gaps, and frequent driver check-ins.", High, Immediate),
            rec("Allow Extra Time", "Pad delivery schedules for slower travel.", High, Today),
            rec("Avoid Secondary Roads", "Prefer main highways over unpaved or poorly maintained roads.", Medium, Today),
        ],
        (Logistics, Heavy) => vec![
            rec("Emergency Deliveries Only", "Limit operations to critical shipments; driving is dangerous.", High, Immediate),
            rec("Secure Outdoor Assets", "Protect inventory, equipment, and vehicles from flooding.", High, Immediate),
            rec("Communication Protocol", "Maintain regular contact with drivers on the road.", High, Immediate),
        ],

        (Energy, Minimal) => vec![
            rec("Solar Panel Maintenance", "Clean and service panels at full expected output.", Medium, Today),
            rec("Grid Optimization", "Window for grid maintenance and infrastructure upgrades.", Low, ThisWeek),
            rec("Demand Planning", "Adjust production forecasts for clear conditions.", Medium, Today),
        ],
        (Energy, Light) => vec![
            rec("Solar Output Monitoring", "Cloud cover reduces solar yield; adjust grid supply.", High, Immediate),
            rec("Equipment Protection", "Verify weather protection on outdoor electrical gear.", Medium, Immediate),
            rec("Backup Systems", "Confirm backup power readiness for weather outages.", Medium, Today),
        ],
        (Energy, Moderate) => vec![
            rec("Grid Stability Monitoring", "Watch lines and substations for weather-related faults.", High, Immediate),
            rec("Renewable Energy Adjustment", "Raise conventional generation to cover reduced solar.", High, Immediate),
            rec("Customer Communication", "Notify customers of possible service disruption.", Medium, Today),
        ],
        (Energy, Heavy) => vec![
            rec("Emergency Response Mode", "Activate outage-response protocols.", High, Immediate),
            rec("Crew Safety", "Recall field crews and suspend outdoor maintenance.", High, Immediate),
            rec("System Monitoring", "Continuous monitoring of critical infrastructure from control centers.", High, Immediate),
        ],

        (Disaster, Minimal) => vec![
            rec("Equipment Inspection", "Routine maintenance of emergency vehicles and gear.", Medium, Today),
            rec("Supply Inventory", "Restock emergency supplies and relief materials.", Medium, Today),
            rec("Training Exercises", "Run outdoor response drills while conditions allow.", Low, ThisWeek),
        ],
        (Disaster, Light) => vec![
            rec("Weather Monitoring", "Increase forecast update frequency.", High, Immediate),
            rec("Communication Check", "Test alert networks and emergency channels.", Medium, Immediate),
            rec("Resource Positioning", "Begin staging resources near potentially affected areas.", Medium, Today),
        ],
        (Disaster, Moderate) => vec![
            rec("Alert Level Increase", "Raise alert level and activate additional personnel.", High, Immediate),
            rec("Resource Deployment", "Pre-position resources in high-risk areas.", High, Immediate),
            rec("Evacuation Planning", "Review plans for flood-prone zones.", High, Immediate),
        ],
        (Disaster, Heavy) => vec![
            rec("Emergency Declaration", "Consider declaring a local emergency and activating all protocols.", High, Immediate),
            rec("Public Warnings", "Issue urgent warnings and evacuation orders for high-risk areas.", High, Immediate),
            rec("Resource Coordination", "Coordinate all available resources and mutual aid.", High, Immediate),
        ],

        (Tourism, Minimal) => vec![
            rec("Outdoor Event Promotion", "Promote tours and outdoor activities in favorable weather.", Medium, Today),
            rec("Extended Operating Hours", "Extend outdoor attraction hours.", Low, Today),
            rec("Equipment Maintenance", "Service outdoor facilities while dry.", Medium, Today),
        ],
        (Tourism, Light) => vec![
            rec("Guest Communication", "Advise guests on conditions and gear.", High, Immediate),
            rec("Indoor Alternatives", "Prepare indoor options in case rain strengthens.", Medium, Immediate),
            rec("Safety Briefing", "Brief outdoor guides on wet-weather protocols.", Medium, Immediate),
        ],
        (Tourism, Moderate) => vec![
            rec("Activity Cancellation", "Postpone outdoor tours and events for guest safety.", High, Immediate),
            rec("Indoor Programming", "Switch to indoor entertainment for guests.", High, Immediate),
            rec("Refund Policy", "Apply weather rescheduling policies to affected bookings.", Medium, Today),
        ],
        (Tourism, Heavy) => vec![
            rec("Guest Safety Protocols", "Restrict outdoor access and activate safety procedures.", High, Immediate),
            rec("Transportation Safety", "Suspend or modify transport services by road conditions.", High, Immediate),
            rec("Communication Updates", "Provide regular facility and weather updates to guests.", Medium, Immediate),
        ],

        (Industrial, Minimal) => vec![
            rec("Outdoor Production", "Full outdoor manufacturing and material handling.", High, Today),
            rec("Equipment Maintenance", "Schedule outdoor servicing and facility repairs.", Medium, Today),
            rec("Material Storage", "Organize outdoor storage and inventory.", Medium, Today),
        ],
        (Industrial, Light) => vec![
            rec("Cover Sensitive Materials", "Shield moisture-sensitive materials and products.", High, Immediate),
            rec("Indoor Focus", "Prioritize indoor lines and quality control.", Medium, Today),
            rec("Supply Chain Monitoring", "Watch for weather-related supplier delays.", Medium, Today),
        ],
        (Industrial, Moderate) => vec![
            rec("Outdoor Operation Suspension", "Pause weather-sensitive outdoor processes.", High, Immediate),
            rec("Material Protection", "Secure outdoor materials and equipment against rain.", High, Immediate),
            rec("Worker Safety", "Apply wet-condition safety protocols.", Medium, Immediate),
        ],
        (Industrial, Heavy) => vec![
            rec("Facility Protection", "Secure facilities and equipment against flood damage.", High, Immediate),
            rec("Production Adjustment", "Shift schedules to indoor, weather-independent lines.", High, Immediate),
            rec("Supply Chain Contingency", "Trigger contingency plans for disrupted logistics.", Medium, Today),
        ],

        (Water, Minimal) => vec![
            rec("Infrastructure Maintenance", "Window for system maintenance and repairs.", Medium, Today),
            rec("Conservation Measures", "Apply conservation strategies during dry conditions.", Medium, Today),
            rec("Quality Testing", "Routine water quality testing and inspections.", Medium, Today),
        ],
        (Water, Light) => vec![
            rec("Reservoir Monitoring", "Track levels and adjust release schedules.", High, Immediate),
            rec("Drainage System Check", "Inspect storm water infrastructure.", Medium, Today),
            rec("Flood Preparation", "Ready flood controls in low-lying areas.", Medium, Today),
        ],
        (Water, Moderate) => vec![
            rec("Flood Control Activation", "Activate flood systems and watch levels closely.", High, Immediate),
            rec("Reservoir Management", "Adjust operations for increased inflow.", High, Immediate),
            rec("Public Communication", "Issue level advisories and flood warnings.", Medium, Immediate),
        ],
        (Water, Heavy) => vec![
            rec("Emergency Flood Response", "Run emergency protocols and dam safety measures.", High, Immediate),
            rec("Critical Infrastructure Protection", "Protect treatment and distribution assets from flooding.", High, Immediate),
            rec("Water Quality Monitoring", "Increase monitoring for flood contamination.", Medium, Immediate),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sector_level_pair_has_actions() {
        for sector in Sector::ALL {
            for level in [
                RainLevel::Minimal,
                RainLevel::Light,
                RainLevel::Moderate,
                RainLevel::Heavy,
            ] {
                let items = actions(sector, level);
                assert!(!items.is_empty(), "{:?}/{:?}", sector, level);
                assert!(items.iter().all(|r| !r.title.is_empty()));
            }
        }
    }

    #[test]
    fn test_heavy_rain_actions_are_urgent() {
        for sector in Sector::ALL {
            let items = actions(sector, RainLevel::Heavy);
            assert!(
                items.iter().any(|r| r.priority == Priority::High
                    && r.timeframe == Timeframe::Immediate),
                "{:?} lacks an immediate high-priority action",
                sector
            );
        }
    }
}
