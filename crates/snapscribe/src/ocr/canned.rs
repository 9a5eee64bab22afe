//! Canned extraction results returned by the mock OCR service.

/// Error attached to every file the mock decides to fail.
pub const FAILURE_MESSAGE: &str = "Image too dark or blurry. Could not extract text.";

pub const CANNED_TEXTS: [&str; 5] = [
    "INVOICE
Date: 10/25/2024
Amount: $150.00
Customer: John Silva
Item: Consulting Services
Payment Method: Bank transfer",
    "SERVICE AGREEMENT

This agreement is entered into by the parties:
CLIENT: Maria Santos
CONTRACTOR: Tech Solutions LLC

Scope: Web software development
Term: 90 calendar days
Total Value: $25,000.00",
    "PAYMENT RECEIPT

Received from Carlos Oliveira
The amount of $500.00
For: Apartment rent
Month: October/2024

Springfield, October 15, 2024",
    "DECLARATION

This is to certify that Ana Paula Costa
is a regularly enrolled student in the
Software Engineering program, class of 2024.

Sincerely,
Academic Office",
    "BANK STATEMENT

Account: 12345-6
Branch: 0001
Period: 10/01/2024 to 10/30/2024

Previous Balance: $1,500.00
Total Credits: $3,200.00
Total Debits: $2,100.00
Current Balance: $2,600.00",
];
