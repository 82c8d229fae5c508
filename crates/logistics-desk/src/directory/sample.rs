//! Sample Directory
//!
//! Fixed records for demos and tests.

use async_trait::async_trait;

use super::Directory;
use crate::error::{DeskError, Result};
use crate::model::{Account, PolicyDocument, Shipment, Warehouse};

/// Directory backed by static sample records
#[derive(Clone, Debug, Default)]
pub struct SampleDirectory;

impl SampleDirectory {
    pub const fn new() -> Self {
        Self
    }
}

fn policy(id: &str, title: &str, topic: &str, content: &str) -> PolicyDocument {
    PolicyDocument {
        id: id.into(),
        title: title.into(),
        topic: topic.into(),
        content: content.into(),
    }
}

fn sample_policies() -> Vec<PolicyDocument> {
    vec![
        policy(
            "POL-010",
            "Customs clearance for imports into Uzbekistan",
            "customs",
            "Clearance usually takes 1 to 3 business days after arrival. Required documents: \
             commercial invoice, packing list, CMR or air waybill, certificate of origin. \
             Duties and VAT are paid by the consignee unless the shipment is DDP.",
        ),
        policy(
            "POL-020",
            "Prohibited and restricted cargo",
            "restricted cargo",
            "We do not carry weapons, narcotics, counterfeit goods or live animals. \
             Lithium batteries, chemicals and medicines need a safety data sheet and \
             prior approval from the operations desk.",
        ),
        policy(
            "POL-030",
            "Supported Incoterms",
            "incoterms",
            "We quote EXW, FOB, CIF, DAP and DDP. Under DDP we clear customs and pay duties \
             on the client's behalf; under DAP the consignee clears customs at destination.",
        ),
        policy(
            "POL-040",
            "Pricing basis and chargeable weight",
            "pricing",
            "Chargeable weight is the greater of actual weight and volumetric weight. \
             Road freight counts 1 cubic meter as 250 kg, air freight as 167 kg. \
             Preliminary estimates are ranges; the final price is confirmed by an operator.",
        ),
        policy(
            "POL-050",
            "Transit times by route",
            "delivery times",
            "China to Tashkent: road 12 to 16 days, rail 18 to 25 days, air 3 to 5 days. \
             Tashkent to Almaty by road: 2 to 3 days. Times exclude customs clearance.",
        ),
        policy(
            "POL-060",
            "Warehousing and consolidation",
            "warehouse",
            "Free storage for 7 calendar days, then 0.50 USD per pallet per day. \
             Consolidation of several suppliers into one truck is available in Guangzhou and Urumqi.",
        ),
    ]
}

fn sample_accounts() -> Vec<Account> {
    vec![
        Account {
            account_id: "TA-20417".into(),
            name: "Dilnoza Karimova".into(),
            company: "Samarkand Textile LLC".into(),
            phone: "(998) 712-3456".into(),
            email: "d.karimova@samtextile.uz".into(),
            balance_due: "USD 1,240.00".into(),
            preferred_language: "uz".into(),
            shipments: vec![
                Shipment {
                    tracking_number: "TAL-558201".into(),
                    route: "Guangzhou - Tashkent".into(),
                    mode: "road".into(),
                    status: "in customs clearance".into(),
                    eta: "2026-10-21".into(),
                },
                Shipment {
                    tracking_number: "TAL-557930".into(),
                    route: "Urumqi - Samarkand".into(),
                    mode: "rail".into(),
                    status: "delivered".into(),
                    eta: "2026-09-30".into(),
                },
            ],
        },
        Account {
            account_id: "TA-31088".into(),
            name: "Sergey Volkov".into(),
            company: "Volkov Trade".into(),
            phone: "(998) 903-1188".into(),
            email: "volkov@vtrade.kz".into(),
            balance_due: "USD 0.00".into(),
            preferred_language: "ru".into(),
            shipments: vec![Shipment {
                tracking_number: "TAL-560044".into(),
                route: "Tashkent - Almaty".into(),
                mode: "road".into(),
                status: "in transit".into(),
                eta: "2026-10-19".into(),
            }],
        },
    ]
}

fn warehouse(name: &str, city: &str, address: &str, zip_code: &str, phone: &str) -> Warehouse {
    Warehouse {
        name: name.into(),
        city: city.into(),
        address: address.into(),
        zip_code: zip_code.into(),
        phone: phone.into(),
        hours: "Mon-Sat 09:00-18:00".into(),
    }
}

fn sample_warehouses() -> Vec<Warehouse> {
    vec![
        warehouse(
            "Tashkent Central Hub",
            "Tashkent",
            "Sergeli district, Yangi Sergeli 12",
            "100000",
            "+998 71 200 1100",
        ),
        warehouse("Samarkand Depot", "Samarkand", "Spitamen shoh 41", "140100", "+998 66 233 0420"),
        warehouse("Fergana Depot", "Fergana", "Al-Fargoniy 7", "150100", "+998 73 244 1577"),
        warehouse("Bukhara Pickup Point", "Bukhara", "Navoi 55", "200100", "+998 65 221 0900"),
        warehouse("Almaty Cross-Dock", "Almaty", "Suyunbay 263", "050000", "+7 727 310 4400"),
    ]
}

#[async_trait]
impl Directory for SampleDirectory {
    async fn policies(&self) -> Result<Vec<PolicyDocument>> {
        Ok(sample_policies())
    }

    async fn account_by_phone(&self, phone_digits: &str) -> Result<Account> {
        sample_accounts()
            .into_iter()
            .find(|a| a.phone_digits() == phone_digits)
            .ok_or_else(|| {
                let tail: String = phone_digits
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                DeskError::AccountNotFound(tail)
            })
    }

    async fn warehouses(&self) -> Result<Vec<Warehouse>> {
        Ok(sample_warehouses())
    }

    fn name(&self) -> &str {
        "SampleDirectory"
    }
}
